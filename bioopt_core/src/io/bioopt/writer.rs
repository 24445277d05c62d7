//! Rendering of a [`Model`] as BioOpt text
use std::fs;
use std::path::Path;

use derive_builder::Builder;

use crate::configuration::CONFIGURATION;
use crate::io::bioopt::sections::SectionKind;
use crate::io::bioopt::BiooptError;
use crate::metabolic_model::expression::{MathExpression, Operand, Operation};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::ReactionMemberList;

/// Options for writing a BioOpt document
#[derive(Builder, Debug, Clone)]
pub struct WriterOptions {
    /// Value written for infinite bounds
    #[builder(default = "CONFIGURATION.read().unwrap().inf")]
    pub inf: f64,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            inf: CONFIGURATION.read().unwrap().inf,
        }
    }
}

impl Model {
    /// Render the model as BioOpt text with default options
    pub fn to_bioopt_string(&self) -> Result<String, BiooptError> {
        self.to_bioopt_string_with(&WriterOptions::default())
    }

    /// Render the model as BioOpt text
    ///
    /// Sections are written in the order reactions, constraints, external metabolites,
    /// objective and design objective. Constraints are only written for reactions whose
    /// bounds differ from the default of their direction, infinite bounds are written as
    /// `±inf`. Objectives must be sums of products (or a single product), anything else
    /// results in [`BiooptError::UnsupportedObjective`].
    ///
    /// # Examples
    /// ```rust
    /// use bioopt_core::metabolic_model::model::Model;
    /// let text = "-REACTIONS\nR1: A + 2 B <- C\n";
    /// let model = Model::from_bioopt_str(text).unwrap().model;
    /// assert!(model
    ///     .to_bioopt_string()
    ///     .unwrap()
    ///     .starts_with("-REACTIONS\nR1\t:\tC -> A + 2 B\n"));
    /// ```
    pub fn to_bioopt_string_with(&self, options: &WriterOptions) -> Result<String, BiooptError> {
        let mut out = String::new();

        out.push_str(SectionKind::Reactions.header());
        out.push('\n');
        for r in &self.reactions {
            out.push_str(&format!(
                "{}\t:\t{} {} {}\n",
                r.name(),
                format_members(&r.reactants),
                r.direction,
                format_members(&r.products)
            ));
        }
        out.push('\n');

        out.push_str(SectionKind::Constraints.header());
        out.push('\n');
        for r in self.reactions.iter().filter(|r| !r.has_default_bounds()) {
            let (lb, ub) = r.bounds.finite(options.inf);
            out.push_str(&format!("{}\t[{}, {}]\n", r.name(), lb, ub));
        }
        out.push('\n');

        out.push_str(SectionKind::ExternalMetabolites.header());
        out.push('\n');
        let mut boundary = self.find_boundary_metabolites();
        // Stable, equal priorities keep the order of discovery
        boundary.sort_by_key(|m| m.order_boundary);
        for m in boundary {
            out.push_str(m.name());
            out.push('\n');
        }
        out.push('\n');

        for (kind, objective) in [
            (SectionKind::Objective, &self.objective),
            (SectionKind::DesignObjective, &self.design_objective),
        ] {
            if let Some(objective) = objective {
                out.push_str(kind.header());
                out.push('\n');
                for line in objective_lines(objective)? {
                    out.push_str(&line);
                    out.push('\n');
                }
                out.push('\n');
            }
        }
        Ok(out)
    }

    /// Write the model to a BioOpt file with default options
    pub fn write_bioopt<P: AsRef<Path>>(&self, path: P) -> Result<(), BiooptError> {
        self.write_bioopt_with(path, &WriterOptions::default())
    }

    pub fn write_bioopt_with<P: AsRef<Path>>(
        &self,
        path: P,
        options: &WriterOptions,
    ) -> Result<(), BiooptError> {
        let text = self.to_bioopt_string_with(options)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Members joined by ` + `, a coefficient of 1 is left out
fn format_members(members: &ReactionMemberList) -> String {
    members
        .iter()
        .map(|m| {
            if m.coefficient().abs() == 1. {
                m.metabolite().to_string()
            } else {
                format!("{} {}", m.coefficient(), m.metabolite())
            }
        })
        .collect::<Vec<String>>()
        .join(" + ")
}

/// One line per added term, each term is a space separated list of reactions and numbers
fn objective_lines(objective: &MathExpression) -> Result<Vec<String>, BiooptError> {
    match objective.operation() {
        Some(Operation::Addition) => objective
            .operands()
            .iter()
            .map(|term| match term {
                Operand::Expression(exp) => format_term(exp),
                leaf => format_leaf(leaf, objective),
            })
            .collect(),
        _ => Ok(vec![format_term(objective)?]),
    }
}

fn format_term(term: &MathExpression) -> Result<String, BiooptError> {
    match term.operation() {
        None | Some(Operation::Multiplication) => Ok(term
            .operands()
            .iter()
            .map(|o| format_leaf(o, term))
            .collect::<Result<Vec<String>, BiooptError>>()?
            .join(" ")),
        Some(_) => Err(BiooptError::UnsupportedObjective(term.to_string())),
    }
}

fn format_leaf(operand: &Operand, parent: &MathExpression) -> Result<String, BiooptError> {
    match operand {
        Operand::Reaction(r) => Ok(r.name().to_string()),
        Operand::Number(n) => Ok(n.to_string()),
        Operand::Expression(_) => Err(BiooptError::UnsupportedObjective(parent.to_string())),
    }
}

#[cfg(test)]
mod writer_tests {
    use super::*;
    use crate::metabolic_model::bounds::Bounds;
    use crate::metabolic_model::reaction::{Direction, ReactionBuilder, ReactionMember};

    fn member(name: &str, coefficient: f64) -> ReactionMember {
        ReactionMember::new(name, coefficient).unwrap()
    }

    fn toy_model() -> Model {
        let mut model = Model::new_empty();
        model.add_reaction(
            ReactionBuilder::default()
                .name("R1")
                .reactants(member("A", 1.) + member("B", 2.5))
                .products(member("C", 3.).into())
                .direction(Direction::Forward)
                .build()
                .unwrap(),
        );
        model.add_reaction(
            ReactionBuilder::default()
                .name("R2")
                .reactants(member("C", 1.).into())
                .products(member("D", 1.).into())
                .direction(Direction::Reversible)
                .bounds(Bounds::new(-10., f64::INFINITY).unwrap())
                .build()
                .unwrap(),
        );
        model.set_boundary("A", true);
        model.set_boundary("D", true);
        model
    }

    #[test]
    fn write_sections() {
        let mut model = toy_model();
        model.objective = Some(
            MathExpression::new(
                Some(Operation::Multiplication),
                vec![Operand::reaction("R2"), 1.0.into(), 1.0.into()],
            )
            .unwrap(),
        );
        let text = model.to_bioopt_string().unwrap();
        assert_eq!(
            text,
            "-REACTIONS\n\
             R1\t:\tA + 2.5 B -> 3 C\n\
             R2\t:\tC <-> D\n\
             \n\
             -CONSTRAINTS\n\
             R2\t[-10, 1000]\n\
             \n\
             -EXTERNAL METABOLITES\n\
             A\n\
             D\n\
             \n\
             -OBJECTIVE\n\
             R2 1 1\n\
             \n"
        );
    }

    #[test]
    fn custom_infinity() {
        let model = toy_model();
        let options = WriterOptionsBuilder::default().inf(99999.).build().unwrap();
        let text = model.to_bioopt_string_with(&options).unwrap();
        assert!(text.contains("R2\t[-10, 99999]\n"));
    }

    #[test]
    fn boundary_order() {
        let mut model = toy_model();
        model.metabolite_mut("A").unwrap().order_boundary = 1;
        let text = model.to_bioopt_string().unwrap();
        assert!(text.contains("-EXTERNAL METABOLITES\nD\nA\n"));
    }

    #[test]
    fn objective_sums() {
        let mut model = toy_model();
        let term = |name: &str, c: f64| -> Operand {
            MathExpression::new(
                Some(Operation::Multiplication),
                vec![Operand::reaction(name), c.into(), c.into()],
            )
            .unwrap()
            .into()
        };
        model.design_objective = Some(
            MathExpression::new(
                Some(Operation::Addition),
                vec![term("R1", 1.), term("R2", 2.), Operand::reaction("R3")],
            )
            .unwrap(),
        );
        let text = model.to_bioopt_string().unwrap();
        assert!(text.ends_with("-DESIGN OBJECTIVE\nR1 1 1\nR2 2 2\nR3\n\n"));
        assert!(!text.contains("-OBJECTIVE"));
    }

    #[test]
    fn unsupported_objective() {
        let mut model = toy_model();
        model.objective = Some(
            MathExpression::new(
                Some(Operation::Subtraction),
                vec![Operand::reaction("R1"), Operand::reaction("R2")],
            )
            .unwrap(),
        );
        match model.to_bioopt_string() {
            Err(BiooptError::UnsupportedObjective(objective)) => assert_eq!(objective, "R1 - R2"),
            _ => panic!("Subtraction can not be written"),
        }
    }
}
