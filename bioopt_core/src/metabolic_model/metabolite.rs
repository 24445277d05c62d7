//! This module provides the metabolite struct representing a metabolite

use std::fmt::{Display, Formatter};
use std::hash::Hash;

use crate::metabolic_model::ModelError;

/// Represents a metabolite
///
/// Two metabolites are equal when their names and boundary conditions are equal, the
/// display priority is ignored.
#[derive(Debug, Clone)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be non-empty)
    name: String,
    /// Whether the metabolite is imported/exported, boundary metabolites are not mass balanced
    pub boundary: bool,
    /// Priority of this metabolite in the external metabolites section, lower is earlier
    pub order_boundary: i32,
}

impl Metabolite {
    /// Create a new internal metabolite
    pub fn new<S: Into<String>>(name: S) -> Result<Metabolite, ModelError> {
        Metabolite::with_boundary(name, false)
    }

    /// Create a new metabolite with a given boundary condition
    pub fn with_boundary<S: Into<String>>(name: S, boundary: bool) -> Result<Metabolite, ModelError> {
        let name = name.into();
        assert_name(&name, "Metabolite")?;
        Ok(Metabolite {
            name,
            boundary,
            order_boundary: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the metabolite
    pub fn set_name<S: Into<String>>(&mut self, name: S) -> Result<(), ModelError> {
        let name = name.into();
        assert_name(&name, "Metabolite")?;
        self.name = name;
        Ok(())
    }
}

impl PartialEq for Metabolite {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.boundary == other.boundary
    }
}

impl Eq for Metabolite {}

impl Hash for Metabolite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state); // Same fields as PartialEq
        self.boundary.hash(state);
    }
}

impl Display for Metabolite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.boundary {
            write!(f, "{}*", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

pub(crate) fn assert_name(name: &str, kind: &'static str) -> Result<(), ModelError> {
    if name.is_empty() {
        return Err(ModelError::EmptyName(kind));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metabolite() {
        let m = Metabolite::with_boundary("H2O", true).unwrap();
        assert_eq!(m.name(), "H2O");
        assert!(m.boundary);
        assert_eq!(m.order_boundary, 0);
        assert!(Metabolite::new("").is_err());
    }

    #[test]
    fn setters() {
        let mut m = Metabolite::new("H2O").unwrap();
        m.set_name("Na").unwrap();
        assert_eq!(m.name(), "Na");
        assert!(m.set_name("").is_err());
        assert_eq!(m.name(), "Na");
        m.boundary = !m.boundary;
        assert!(m.boundary);
    }

    #[test]
    fn equality_ignores_display_priority() {
        let a = Metabolite::new("A").unwrap();
        let mut b = Metabolite::new("A").unwrap();
        b.order_boundary = 5;
        assert_eq!(a, b);
        b.boundary = true;
        assert_ne!(a, b);
        assert_eq!(format!("{}", b), "A*");
    }
}
