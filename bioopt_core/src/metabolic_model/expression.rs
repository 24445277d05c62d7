//! Minimal expression tree used for the objective and design objective of a model
use std::fmt::{Display, Formatter};

use crate::metabolic_model::ModelError;

/// Arithmetic operation of a [`MathExpression`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    /// Unary minus
    Negation,
}

impl Operation {
    pub fn is_unary(&self) -> bool {
        matches!(self, Operation::Negation)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Addition => "+",
            Operation::Subtraction | Operation::Negation => "-",
            Operation::Multiplication => "*",
            Operation::Division => "/",
        }
    }

    /// Operations with a lower priority bind tighter. Multiplication and division share a
    /// level, as do addition and subtraction.
    pub fn priority(&self) -> u8 {
        match self {
            Operation::Negation => 0,
            Operation::Multiplication | Operation::Division => 1,
            Operation::Addition | Operation::Subtraction => 2,
        }
    }

    fn is_associative(&self) -> bool {
        matches!(self, Operation::Addition | Operation::Multiplication)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Reference to a reaction of a model by name
///
/// References created while parsing only carry the name, the index into
/// [`Model::reactions`](crate::metabolic_model::model::Model) is filled in by
/// [`Model::unify_reaction_references`](crate::metabolic_model::model::Model::unify_reaction_references).
/// Equality only considers the name.
#[derive(Debug, Clone)]
pub struct ReactionRef {
    name: String,
    pub(crate) index: Option<usize>,
}

impl ReactionRef {
    pub fn new<S: Into<String>>(name: S) -> Self {
        ReactionRef {
            name: name.into(),
            index: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the referenced reaction, `None` until resolved
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_resolved(&self) -> bool {
        self.index.is_some()
    }
}

impl PartialEq for ReactionRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Operand of a [`MathExpression`]
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Expression(MathExpression),
    Reaction(ReactionRef),
    Number(f64),
}

impl Operand {
    pub fn reaction<S: Into<String>>(name: S) -> Operand {
        Operand::Reaction(ReactionRef::new(name))
    }

    fn fmt_within(&self, parent: Option<Operation>, position: usize, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Expression(exp) => {
                if exp.needs_parentheses(parent, position) {
                    write!(f, "({})", exp)
                } else {
                    write!(f, "{}", exp)
                }
            }
            Operand::Reaction(r) => write!(f, "{}", r.name),
            Operand::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Number(value)
    }
}

impl From<MathExpression> for Operand {
    fn from(value: MathExpression) -> Self {
        Operand::Expression(value)
    }
}

impl From<ReactionRef> for Operand {
    fn from(value: ReactionRef) -> Self {
        Operand::Reaction(value)
    }
}

/// An operation applied to a list of operands
///
/// Unary operations take exactly one operand and binary operations at least two. An
/// expression without an operation wraps exactly one operand, e.g. a bare reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct MathExpression {
    operation: Option<Operation>,
    operands: Vec<Operand>,
}

impl MathExpression {
    pub fn new(operation: Option<Operation>, operands: Vec<Operand>) -> Result<Self, ModelError> {
        MathExpression::assert_valid(operation, operands.len())?;
        Ok(MathExpression {
            operation,
            operands,
        })
    }

    /// Expression without operation around a single operand
    pub fn wrap(operand: Operand) -> Self {
        MathExpression {
            operation: None,
            operands: vec![operand],
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn set_operation(&mut self, operation: Option<Operation>) -> Result<(), ModelError> {
        MathExpression::assert_valid(operation, self.operands.len())?;
        self.operation = operation;
        Ok(())
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn set_operands(&mut self, operands: Vec<Operand>) -> Result<(), ModelError> {
        MathExpression::assert_valid(self.operation, operands.len())?;
        self.operands = operands;
        Ok(())
    }

    /// Non-expression leaves (reactions and numbers) in order of first occurrence,
    /// duplicates removed
    pub fn find_variables(&self) -> Vec<&Operand> {
        let mut variables: Vec<&Operand> = Vec::new();
        for v in self.leaves() {
            if !variables.contains(&v) {
                variables.push(v);
            }
        }
        variables
    }

    /// All reaction references in the tree, depth first
    pub fn reactions(&self) -> Vec<&ReactionRef> {
        self.leaves()
            .into_iter()
            .filter_map(|o| match o {
                Operand::Reaction(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn leaves(&self) -> Vec<&Operand> {
        let mut leaves = Vec::new();
        for o in &self.operands {
            match o {
                Operand::Expression(exp) => leaves.extend(exp.leaves()),
                other => leaves.push(other),
            }
        }
        leaves
    }

    /// Visit every reaction reference mutably, depth first
    pub(crate) fn for_each_reaction_mut<F: FnMut(&mut ReactionRef)>(&mut self, f: &mut F) {
        for o in self.operands.iter_mut() {
            match o {
                Operand::Expression(exp) => exp.for_each_reaction_mut(f),
                Operand::Reaction(r) => f(r),
                Operand::Number(_) => {}
            }
        }
    }

    fn needs_parentheses(&self, parent: Option<Operation>, position: usize) -> bool {
        let (Some(own), Some(parent)) = (self.operation, parent) else {
            return false;
        };
        if own.is_unary() {
            return false;
        }
        if own.priority() != parent.priority() {
            return own.priority() > parent.priority();
        }
        // Same level, a - (b - c) and a / (b * c) keep their parentheses
        !(position == 0 || (own == parent && parent.is_associative()))
    }

    fn assert_valid(operation: Option<Operation>, count: usize) -> Result<(), ModelError> {
        let valid = match operation {
            None => count == 1,
            Some(op) if op.is_unary() => count == 1,
            Some(_) => count >= 2,
        };
        if !valid {
            return Err(ModelError::InvalidOperandCount { operation, count });
        }
        Ok(())
    }
}

impl Display for MathExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.operation {
            None => self.operands[0].fmt_within(None, 0, f),
            Some(op) if op.is_unary() => {
                write!(f, "{}", op)?;
                // Anything but a leaf gets parentheses after a unary minus
                match &self.operands[0] {
                    Operand::Expression(exp) if exp.operation.is_some() => write!(f, "({})", exp),
                    other => other.fmt_within(Some(op), 0, f),
                }
            }
            Some(op) => {
                for (i, o) in self.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op)?;
                    }
                    o.fmt_within(Some(op), i, f)?;
                }
                Ok(())
            }
        }
    }
}
