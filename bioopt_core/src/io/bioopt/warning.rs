//! Non fatal problems found while parsing a BioOpt document
use std::fmt::{Display, Formatter};

use crate::io::bioopt::sections::SectionKind;

/// What a [`ParseWarning`] is about
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    MissingSection(SectionKind),
    /// Several headers name the same kind of section, only the first one is read
    DuplicateSection(String),
    UnknownConstraintReaction(String),
    UnknownExternalMetabolite(String),
    UnknownObjectiveReaction(String),
    /// Negative lower bound for a reaction declared forward
    DirectionConflict { reaction: String, lb: f64 },
    NameContainsWhitespace { kind: &'static str, name: String },
    NameIsNumber { kind: &'static str, name: String },
    DuplicateReaction(String),
}

impl Display for WarningKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::MissingSection(kind) => write!(f, "Section {} not found", kind),
            WarningKind::DuplicateSection(header) => {
                write!(f, "Section {} ignored, a section of the same kind was already read", header)
            }
            WarningKind::UnknownConstraintReaction(name) => {
                write!(f, "Constraint for unknown reaction '{}'", name)
            }
            WarningKind::UnknownExternalMetabolite(name) => {
                write!(f, "External metabolite '{}' is not used by any reaction", name)
            }
            WarningKind::UnknownObjectiveReaction(name) => {
                write!(f, "Objective references unknown reaction '{}'", name)
            }
            WarningKind::DirectionConflict { reaction, lb } => write!(
                f,
                "Reaction '{}' is irreversible but its lower bound is negative ({})",
                reaction, lb
            ),
            WarningKind::NameContainsWhitespace { kind, name } => {
                write!(f, "{} '{}' contains spaces", kind, name)
            }
            WarningKind::NameIsNumber { kind, name } => write!(f, "{} name is a number: '{}'", kind, name),
            WarningKind::DuplicateReaction(name) => {
                write!(f, "Reaction '{}' is declared more than once", name)
            }
        }
    }
}

/// A warning attributed to a position in the parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// Name of the parsed file, `<string>` for text parsed from memory
    pub file: String,
    /// Section the warning was raised in, `None` for document wide warnings
    pub section: Option<SectionKind>,
    /// 1-based line within the section
    pub line: Option<usize>,
    /// 1-based line within the document
    pub document_line: Option<usize>,
    pub kind: WarningKind,
}

impl Display for ParseWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.document_line {
            Some(line) => write!(f, "{}:{}: {}", self.file, line, self.kind),
            None => write!(f, "{}: {}", self.file, self.kind),
        }
    }
}
