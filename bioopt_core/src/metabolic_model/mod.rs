//! Module providing the Model struct for representing a BioOpt metabolic model.
use derive_builder::UninitializedFieldError;
use thiserror::Error;

use crate::metabolic_model::expression::Operation;

pub mod bounds;
pub mod commune;
pub mod expression;
pub mod metabolite;
pub mod model;
pub mod reaction;

/// Violations of the invariants of the model value types
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("{0} name is empty string")]
    EmptyName(&'static str),
    #[error("Lower bound is greater than upper bound or not a number ({lb} > {ub})")]
    InvalidBounds { lb: f64, ub: f64 },
    #[error("Reaction member coefficient must be positive and finite: {0}")]
    NonPositiveCoefficient(f64),
    #[error("Operation {operation:?} can not have {count} operand(s)")]
    InvalidOperandCount {
        operation: Option<Operation>,
        count: usize,
    },
    #[error("Reaction {0} is not reversible. Only reversible reactions can be reversed")]
    IrreversibleReaction(String),
    #[error("Reaction {0} effective direction is strictly forward and cannot be reversed")]
    StrictlyForward(String),
    #[error("Required field {0} was not set")]
    MissingField(&'static str),
}

impl From<UninitializedFieldError> for ModelError {
    fn from(e: UninitializedFieldError) -> Self {
        ModelError::MissingField(e.field_name())
    }
}
