//! Splitting of a BioOpt document into its sections
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^-[\w ]+\r?$").unwrap());
static NEW_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\n\r|\n").unwrap());

/// The sections a BioOpt document is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Reactions,
    Constraints,
    ExternalMetabolites,
    Objective,
    DesignObjective,
}

impl SectionKind {
    /// All kinds, in the order they are written
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Reactions,
        SectionKind::Constraints,
        SectionKind::ExternalMetabolites,
        SectionKind::Objective,
        SectionKind::DesignObjective,
    ];

    /// Header used when writing the section
    pub fn header(&self) -> &'static str {
        match self {
            SectionKind::Reactions => "-REACTIONS",
            SectionKind::Constraints => "-CONSTRAINTS",
            SectionKind::ExternalMetabolites => "-EXTERNAL METABOLITES",
            SectionKind::Objective => "-OBJECTIVE",
            SectionKind::DesignObjective => "-DESIGN OBJECTIVE",
        }
    }

    /// Whether a header names this kind of section
    ///
    /// Headers vary between files (`-OBJ`, `-OBJECTIVE`, `-DESIGNOBJ`, `-CONSTRAINS`), so they
    /// are matched by case insensitive substrings. Every kind is looked up on its own, a header
    /// like `-REACTIONS TO EXCLUDE` still counts as a reactions section.
    pub fn matches(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        match self {
            SectionKind::Reactions => header.contains("reac"),
            SectionKind::Constraints => header.contains("cons"),
            SectionKind::ExternalMetabolites => header.contains("ext"),
            SectionKind::Objective => header.contains("obj") && !header.contains("des"),
            SectionKind::DesignObjective => header.contains("obj") && header.contains("des"),
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// A section of a document: its header and the text up to the next header
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'t> {
    /// Header as written, without the line break
    pub header: &'t str,
    pub body: &'t str,
    /// Line of the document (1-based) on which the body starts
    pub first_line: usize,
}

impl<'t> Section<'t> {
    /// Lines of the body with their 1-based number within the section
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'t str)> {
        NEW_LINE
            .split(self.body)
            .enumerate()
            .map(|(i, line)| (i + 1, line))
    }

    /// Line of the document corresponding to a line of the section
    pub fn document_line(&self, line: usize) -> usize {
        self.first_line + line - 1
    }
}

/// Find all sections of a document in order of appearance, text before the first header
/// is ignored
pub fn find_sections(text: &str) -> Vec<Section<'_>> {
    let headers: Vec<regex::Match> = SECTION_HEADER.find_iter(text).collect();
    let mut sections = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let start = (header.end() + 1).min(text.len());
        let end = headers
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len())
            .max(start);
        sections.push(Section {
            header: header.as_str().trim_end(),
            body: &text[start..end],
            first_line: text[..start].matches('\n').count() + 1,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_headers() {
        for header in ["-OBJECTIVE", "-OBJ", "-Obj", "-OBJ FUNCTION"] {
            assert!(SectionKind::Objective.matches(header), "{}", header);
            assert!(!SectionKind::DesignObjective.matches(header), "{}", header);
        }
        for header in ["-DESIGN OBJECTIVE", "-DESIGNOBJ"] {
            assert!(SectionKind::DesignObjective.matches(header), "{}", header);
            assert!(!SectionKind::Objective.matches(header), "{}", header);
        }
        assert!(SectionKind::Constraints.matches("-CONSTRAINS"));
        assert!(SectionKind::ExternalMetabolites.matches("-EXTERNAL METABOLITES"));
        assert!(SectionKind::Reactions.matches("-reactions"));
        assert!(!SectionKind::Reactions.matches("-CONSTRAINTS"));
    }

    #[test]
    fn split_sections() {
        let text = "ignored\n-REACTIONS\nR1: A -> B\nR2: B -> C\n\n-CONSTRAINTS\nR1 [0, 10]\n-OBJ\nR1";
        let sections = find_sections(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].header, "-REACTIONS");
        assert_eq!(sections[0].body, "R1: A -> B\nR2: B -> C\n\n");
        assert_eq!(sections[0].first_line, 3);
        assert_eq!(sections[1].header, "-CONSTRAINTS");
        assert_eq!(sections[1].body, "R1 [0, 10]\n");
        assert_eq!(sections[1].first_line, 7);
        assert_eq!(sections[2].header, "-OBJ");
        assert_eq!(sections[2].body, "R1");
    }

    #[test]
    fn windows_line_endings() {
        let text = "-REACTIONS\r\nR1: A -> B\r\nR2: B -> C\r\n-OBJ\r\nR1 1 1\r\n";
        let sections = find_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].header, "-REACTIONS");
        let lines: Vec<(usize, &str)> = sections[0].lines().collect();
        assert_eq!(lines, vec![(1, "R1: A -> B"), (2, "R2: B -> C"), (3, "")]);
        assert_eq!(sections[1].document_line(1), 5);
    }

    #[test]
    fn header_at_end_of_text() {
        let sections = find_sections("-REACTIONS\nR1: A -> B\n-DESIGNOBJ");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].body, "");
    }

    #[test]
    fn headers_need_their_own_line() {
        assert!(find_sections("R1: A -> B -REACTIONS\n").is_empty());
        assert!(find_sections("-R1: A -> B\n").is_empty());
    }
}
