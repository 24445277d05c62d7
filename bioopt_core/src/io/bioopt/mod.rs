//! Module for reading and writing models in the BioOpt text format
//!
//! A BioOpt document consists of sections introduced by a header line starting with `-`:
//! ```text
//! -REACTIONS
//! R1 : A + 2 B -> C
//! R2 : C <-> D        # comment
//!
//! -CONSTRAINTS
//! R2 [-10, 10]
//!
//! -EXTERNAL METABOLITES
//! A
//! D
//!
//! -OBJECTIVE
//! R2 1 1
//!
//! -DESIGN OBJECTIVE
//! R1 1 1
//! ```
use std::fs;
use std::path::Path;

use derive_builder::Builder;
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::io::bioopt::line_parser::LineError;
use crate::io::bioopt::parser::BiooptParser;
use crate::io::bioopt::warning::ParseWarning;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::ModelError;

pub mod comments;
pub mod line_parser;
pub mod parser;
pub mod sections;
pub mod warning;
pub mod writer;

/// Options for parsing a BioOpt document
#[derive(Builder, Debug, Clone)]
pub struct ParserOptions {
    /// Bounds whose absolute value equals `inf` are read as infinite, `None` reads all
    /// bounds as written
    #[builder(default = "Some(CONFIGURATION.read().unwrap().inf)")]
    pub inf: Option<f64>,
    /// File name used in warnings
    #[builder(setter(into, strip_option), default = "None")]
    pub filename: Option<String>,
    /// Fail on the first warning instead of collecting it
    #[builder(default = "false")]
    pub strict: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            inf: Some(CONFIGURATION.read().unwrap().inf),
            filename: None,
            strict: false,
        }
    }
}

/// A parsed model together with the warnings raised while parsing it
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub model: Model,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Error, Debug)]
pub enum BiooptError {
    #[error("Syntax error in section {section} on line {line}: '{content}'")]
    Syntax {
        section: String,
        /// 1-based line within the section
        line: usize,
        /// 1-based line within the document
        document_line: usize,
        content: String,
        source: LineError,
    },
    #[error("Warning treated as error: {0}")]
    Warning(ParseWarning),
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
    #[error("Objective can not be written in BioOpt format: {0}")]
    UnsupportedObjective(String),
    #[error("Invalid model")]
    InvalidModel(#[from] ModelError),
}

/// Parse a BioOpt document
///
/// # Examples
/// ```rust
/// use bioopt_core::io::bioopt::{parse_bioopt, ParserOptions};
/// let text = "-REACTIONS\nR1: A -> B\n-CONSTRAINTS\nR9 [0, 1]\n";
/// let report = parse_bioopt(text, &ParserOptions::default()).unwrap();
/// assert_eq!(report.model.reactions.len(), 1);
/// // Missing sections and the unknown reaction R9
/// assert_eq!(report.warnings.len(), 4);
/// ```
pub fn parse_bioopt(text: &str, options: &ParserOptions) -> Result<ParseReport, BiooptError> {
    BiooptParser::new(options.clone()).parse(text)
}

impl Model {
    /// Parse a model from BioOpt text with default options
    pub fn from_bioopt_str(text: &str) -> Result<ParseReport, BiooptError> {
        parse_bioopt(text, &ParserOptions::default())
    }

    pub fn from_bioopt_str_with(text: &str, options: &ParserOptions) -> Result<ParseReport, BiooptError> {
        parse_bioopt(text, options)
    }

    /// Read a model from a BioOpt file with default options
    pub fn read_bioopt<P: AsRef<Path>>(path: P) -> Result<ParseReport, BiooptError> {
        Model::read_bioopt_with(path, &ParserOptions::default())
    }

    /// Read a model from a BioOpt file, warnings name the file unless `options` already
    /// carries a file name
    pub fn read_bioopt_with<P: AsRef<Path>>(
        path: P,
        options: &ParserOptions,
    ) -> Result<ParseReport, BiooptError> {
        let text = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) => return Err(BiooptError::UnableToRead(format!("{:?}", err))),
        };
        let mut options = options.clone();
        if options.filename.is_none() {
            options.filename = Some(path.as_ref().display().to_string());
        }
        BiooptParser::new(options).parse(&text)
    }
}
