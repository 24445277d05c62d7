//! Utility functions for turning free form names into identifiers
use std::collections::HashSet;

/// Convert a name into an SBML style identifier
///
/// Runs of characters other than ASCII letters and digits become a single `_`, a trailing
/// `_` is dropped and a leading digit gets a `_` in front.
pub(crate) fn to_sbml_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 1);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        id.push('_');
    }
    let mut last = None;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c);
            last = Some(c);
        } else if last != Some('_') {
            id.push('_');
            last = Some('_');
        }
    }
    if id.len() > 1 && id.ends_with('_') {
        id.pop();
    }
    id
}

/// Identifier for `name` which is not yet in `existing`, `_1`, `_2`, ... are appended
/// as needed. The identifier is added to `existing`.
pub(crate) fn unique_sbml_id(name: &str, existing: &mut HashSet<String>) -> String {
    let base = to_sbml_id(name);
    let mut id = base.clone();
    let mut count = 1;
    while existing.contains(&id) {
        id = format!("{}_{}", base, count);
        count += 1;
    }
    existing.insert(id.clone());
    id
}
