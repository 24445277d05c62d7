//! Parsers for the single lines of each BioOpt section
//!
//! Every function takes one line with the comments already stripped.
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::metabolic_model::bounds::Bounds;
use crate::metabolic_model::expression::{MathExpression, Operand, Operation};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::{Direction, Reaction, ReactionMember, ReactionMemberList};
use crate::metabolic_model::ModelError;

const NUMBER: &str = r"[-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?";

static MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^(\(?({}) *\)? +)?(.*)$", NUMBER)).unwrap());
static MEMBER_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\+\s+").unwrap());
static SPACED_DIRECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(<->|<-|->)\s+").unwrap());
static DIRECTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*(<->|<-|->)\s*").unwrap());
static CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(.*?)\s*\[\s*({})\s*,\s*({})\s*\]$", NUMBER, NUMBER)).unwrap()
});
static WHOLE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", NUMBER)).unwrap());

/// Syntax error in a single line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("Line is empty")]
    EmptyLine,
    #[error("Expected exactly one ':' between reaction name and equation, found {0}")]
    SeparatorCount(usize),
    #[error("No reaction direction (->, <- or <->) found")]
    NoDirection,
    #[error("Found {0} reaction directions, expected exactly one")]
    MultipleDirections(usize),
    #[error("Reaction does not consist of reactants and products")]
    MissingSide,
    #[error("Reaction member list is empty")]
    EmptyMemberList,
    #[error("Could not parse reaction member '{0}'")]
    MalformedMember(String),
    #[error("Could not parse reaction constraint '{0}'")]
    MalformedConstraint(String),
    #[error("Invalid value")]
    InvalidValue(#[from] ModelError),
}

/// Whether a string is a number as written in BioOpt documents
pub fn is_number(s: &str) -> bool {
    WHOLE_NUMBER.is_match(s)
}

/// Parse a reaction member such as `2.5 A`, `(2) A` or `A`. Without coefficient the
/// coefficient is 1, everything after the coefficient is the metabolite name.
pub fn parse_reaction_member(member: &str) -> Result<ReactionMember, LineError> {
    let member = member.trim();
    if member.is_empty() {
        return Err(LineError::EmptyLine);
    }
    let captures = MEMBER
        .captures(member)
        .ok_or_else(|| LineError::MalformedMember(member.to_string()))?;
    let coefficient = match captures.get(2) {
        Some(c) => c
            .as_str()
            .parse::<f64>()
            .map_err(|_| LineError::MalformedMember(member.to_string()))?,
        None => 1.,
    };
    let name = captures.get(3).map(|m| m.as_str().trim()).unwrap_or("");
    if name.is_empty() {
        return Err(LineError::MalformedMember(member.to_string()));
    }
    Ok(ReactionMember::new(name, coefficient)?)
}

/// Parse members separated by ` + `
pub fn parse_reaction_member_list(list: &str) -> Result<ReactionMemberList, LineError> {
    let list = list.trim();
    if list.is_empty() {
        return Err(LineError::EmptyMemberList);
    }
    MEMBER_SEPARATOR
        .split(list)
        .map(parse_reaction_member)
        .collect()
}

/// Parse a reaction line `name : reactants direction products`
///
/// The direction is `->`, `<->` or `<-`. Reactions written with `<-` are turned into forward
/// reactions with reactants and products exchanged. Directions surrounded by whitespace are
/// preferred, so metabolite names may contain arrows as long as the direction is spaced.
///
/// # Examples
/// ```rust
/// use bioopt_core::io::bioopt::line_parser::parse_reaction;
/// use bioopt_core::metabolic_model::reaction::Direction;
/// let r = parse_reaction("R1: A + 2.5 B <- 3 C").unwrap();
/// assert_eq!(r.name(), "R1");
/// assert_eq!(r.direction, Direction::Forward);
/// assert_eq!(r.reactants[0].metabolite(), "C");
/// assert_eq!(r.products[1].coefficient(), 2.5);
/// ```
pub fn parse_reaction(line: &str) -> Result<Reaction, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineError::EmptyLine);
    }
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != 2 {
        return Err(LineError::SeparatorCount(parts.len() - 1));
    }
    let name = parts[0].trim();
    let equation = parts[1];

    let direction = find_direction(equation)?;
    let lhs = &equation[..direction.start()];
    let rhs = &equation[direction.end()..];
    if lhs.trim().is_empty() || rhs.trim().is_empty() {
        return Err(LineError::MissingSide);
    }
    let lhs = parse_reaction_member_list(lhs)?;
    let rhs = parse_reaction_member_list(rhs)?;

    let (reactants, products, direction) = match direction.as_str().trim() {
        "<-" => (rhs, lhs, Direction::Forward),
        "->" => (lhs, rhs, Direction::Forward),
        _ => (lhs, rhs, Direction::Reversible),
    };
    Ok(Reaction::new(name, reactants, products, Some(direction), None)?)
}

fn find_direction(equation: &str) -> Result<regex::Match<'_>, LineError> {
    for pattern in [&*SPACED_DIRECTION, &*DIRECTION] {
        let found: Vec<regex::Match> = pattern.find_iter(equation).collect();
        match found.len() {
            0 => continue,
            1 => return Ok(found[0]),
            n => return Err(LineError::MultipleDirections(n)),
        }
    }
    Err(LineError::NoDirection)
}

/// Parse a constraint line `name [lb, ub]` into a reaction carrying only name and bounds
///
/// With `inf` set, bounds of exactly `±inf` are read as infinite, other values are kept.
pub fn parse_constraint(line: &str, inf: Option<f64>) -> Result<Reaction, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineError::EmptyLine);
    }
    let captures = CONSTRAINT
        .captures(line)
        .ok_or_else(|| LineError::MalformedConstraint(line.to_string()))?;
    let parse_bound = |i: usize| -> Result<f64, LineError> {
        let value = captures[i]
            .parse::<f64>()
            .map_err(|_| LineError::MalformedConstraint(line.to_string()))?;
        Ok(match inf {
            Some(inf) if value.abs() == inf => f64::INFINITY.copysign(value),
            _ => value,
        })
    };
    let bounds = Bounds::new(parse_bound(2)?, parse_bound(3)?)?;
    Ok(Reaction::bounds_only(captures[1].trim(), bounds)?)
}

/// The whole line is the name of an external metabolite
pub fn parse_external_metabolite(line: &str) -> Result<Metabolite, LineError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(LineError::EmptyLine);
    }
    Ok(Metabolite::with_boundary(line, true)?)
}

/// Parse an objective line such as `R1 1 1`
///
/// Tokens which parse as a float become numeric operands, every other token references a
/// reaction by name.
/// A single token is wrapped as it is, several tokens are multiplied.
pub fn parse_objective_line(line: &str) -> Result<MathExpression, LineError> {
    let operands: Vec<Operand> = line
        .split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(value) => Operand::Number(value),
            Err(_) => Operand::reaction(token),
        })
        .collect();
    match operands.len() {
        0 => Err(LineError::EmptyLine),
        1 => Ok(MathExpression::wrap(operands.into_iter().next().ok_or(LineError::EmptyLine)?)),
        _ => Ok(MathExpression::new(Some(Operation::Multiplication), operands)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_members() {
        let m = parse_reaction_member("2.5 B").unwrap();
        assert_eq!(m.metabolite(), "B");
        assert_eq!(m.coefficient(), 2.5);
        let m = parse_reaction_member("(3) C").unwrap();
        assert_eq!(m.coefficient(), 3.);
        assert_eq!(m.metabolite(), "C");
        let m = parse_reaction_member("1e-2 D").unwrap();
        assert!((m.coefficient() - 0.01).abs() < 1e-12);
        let m = parse_reaction_member("A").unwrap();
        assert_eq!(m.coefficient(), 1.);
        // Leading digits belong to the name unless followed by a space
        let m = parse_reaction_member("3PG").unwrap();
        assert_eq!(m.metabolite(), "3PG");
        assert_eq!(m.coefficient(), 1.);
        let m = parse_reaction_member("2 5'-AMP, \"x\"").unwrap();
        assert_eq!(m.metabolite(), "5'-AMP, \"x\"");
        assert_eq!(m.coefficient(), 2.);
    }

    #[test]
    fn invalid_members() {
        assert!(matches!(
            parse_reaction_member("-1 A"),
            Err(LineError::InvalidValue(ModelError::NonPositiveCoefficient(_)))
        ));
        assert!(matches!(parse_reaction_member("0 A"), Err(LineError::InvalidValue(_))));
        assert!(parse_reaction_member("").is_err());
        assert!(matches!(parse_reaction_member_list("   "), Err(LineError::EmptyMemberList)));
    }

    #[test]
    fn member_lists() {
        let list = parse_reaction_member_list("A + 2.5 B").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].metabolite(), "A");
        assert_eq!(list[1].metabolite(), "B");
        // Plus signs without spaces are part of names
        let list = parse_reaction_member_list("Na+ + H+").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].metabolite(), "Na+");
        assert_eq!(list[1].metabolite(), "H+");
    }

    #[test]
    fn reactions() {
        let r = parse_reaction("R1: A + 2.5 B -> 3 C").unwrap();
        assert_eq!(r.name(), "R1");
        assert_eq!(r.direction, Direction::Forward);
        assert_eq!(r.bounds, Bounds::forward());
        assert_eq!(r.reactants.len(), 2);
        assert_eq!(r.reactants[0].coefficient(), 1.);
        assert_eq!(r.reactants[1].coefficient(), 2.5);
        assert_eq!(r.products[0].coefficient(), 3.);

        let r = parse_reaction("R2 : B + C <-> E").unwrap();
        assert_eq!(r.name(), "R2");
        assert_eq!(r.direction, Direction::Reversible);
        assert_eq!(r.bounds, Bounds::unbounded());

        let r = parse_reaction("R3: A <- B").unwrap();
        assert_eq!(r.direction, Direction::Forward);
        assert_eq!(r.reactants[0].metabolite(), "B");
        assert_eq!(r.products[0].metabolite(), "A");

        let r = parse_reaction("R4: A->B").unwrap();
        assert_eq!(r.reactants[0].metabolite(), "A");
        assert_eq!(r.products[0].metabolite(), "B");

        // Spaced directions win over arrows inside names
        let r = parse_reaction("R5: A->B -> C").unwrap();
        assert_eq!(r.reactants[0].metabolite(), "A->B");
        assert_eq!(r.products[0].metabolite(), "C");
    }

    #[test]
    fn invalid_reactions() {
        assert!(matches!(parse_reaction("R1 A -> B"), Err(LineError::SeparatorCount(0))));
        assert!(matches!(parse_reaction("R1: A: -> B"), Err(LineError::SeparatorCount(2))));
        assert!(matches!(parse_reaction("R1: A = B"), Err(LineError::NoDirection)));
        assert!(matches!(
            parse_reaction("R1: A -> B -> C"),
            Err(LineError::MultipleDirections(2))
        ));
        assert!(matches!(parse_reaction("R1: -> B"), Err(LineError::MissingSide)));
        assert!(matches!(parse_reaction("R1: A ->"), Err(LineError::MissingSide)));
        assert!(matches!(
            parse_reaction(": A -> B"),
            Err(LineError::InvalidValue(ModelError::EmptyName(_)))
        ));
    }

    #[test]
    fn constraints() {
        let r = parse_constraint("R1 [-10, 100]", Some(1000.)).unwrap();
        assert_eq!(r.name(), "R1");
        assert_eq!(r.bounds, Bounds::new(-10., 100.).unwrap());
        assert_eq!(r.direction, Direction::Reversible);

        let r = parse_constraint("R 2\t[ -1000 ,1e3 ]", Some(1000.)).unwrap();
        assert_eq!(r.name(), "R 2");
        assert_eq!(r.bounds, Bounds::unbounded());

        let r = parse_constraint("R3[-1000, 1000]", None).unwrap();
        assert_eq!(r.bounds, Bounds::new(-1000., 1000.).unwrap());

        // Finite bounds beyond the sentinel stay finite
        let r = parse_constraint("R4 [-5000, 2000]", Some(1000.)).unwrap();
        assert_eq!(r.bounds, Bounds::new(-5000., 2000.).unwrap());

        assert!(matches!(
            parse_constraint("R1 [10]", None),
            Err(LineError::MalformedConstraint(_))
        ));
        assert!(matches!(
            parse_constraint("R1 [10, 1]", None),
            Err(LineError::InvalidValue(ModelError::InvalidBounds { .. }))
        ));
        assert!(parse_constraint("[0, 1]", None).is_err());
    }

    #[test]
    fn external_metabolites() {
        let m = parse_external_metabolite("  Glucose ext ").unwrap();
        assert_eq!(m.name(), "Glucose ext");
        assert!(m.boundary);
    }

    #[test]
    fn objective_lines() {
        let ex = parse_objective_line("R1 1 1").unwrap();
        assert_eq!(ex.operation(), Some(Operation::Multiplication));
        assert_eq!(
            ex.operands(),
            &[Operand::reaction("R1"), Operand::Number(1.), Operand::Number(1.)]
        );
        let ex = parse_objective_line("R1").unwrap();
        assert_eq!(ex.operation(), None);
        assert_eq!(ex.operands(), &[Operand::reaction("R1")]);
        let ex = parse_objective_line("R1 2. 2.").unwrap();
        assert_eq!(
            ex.operands(),
            &[Operand::reaction("R1"), Operand::Number(2.), Operand::Number(2.)]
        );
        let ex = parse_objective_line("R2 inf -2.5e1").unwrap();
        assert_eq!(
            ex.operands(),
            &[
                Operand::reaction("R2"),
                Operand::Number(f64::INFINITY),
                Operand::Number(-25.)
            ]
        );
        assert!(parse_objective_line("  ").is_err());
    }

    #[test]
    fn numbers() {
        assert!(is_number("1"));
        assert!(is_number("-.5"));
        assert!(is_number("+2E-3"));
        assert!(!is_number("1."));
        assert!(!is_number("R1"));
        assert!(!is_number("NaN"));
    }
}
