//! This module provides the Model struct for representing an entire BioOpt model
use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use crate::metabolic_model::expression::{MathExpression, Operand, Operation, ReactionRef};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

/// Represents a constraint based metabolic model
///
/// Metabolites are stored once, keyed by name, in [`Model::metabolites`]. Reaction members
/// and objective expressions refer to metabolites and reactions by name, so changing the
/// boundary condition of a metabolite or the bounds of a reaction is seen by every reference.
///
/// ### Note
/// After editing [`Model::reactions`] or [`Model::objective`] directly, call
/// [`Model::unify_references`] to register new metabolites and resolve objective references.
#[derive(Clone, Debug, Default)]
pub struct Model {
    /// Reactions in declaration order
    pub reactions: Vec<Reaction>,
    /// Map of metabolite names to Metabolite objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Optimization target (i.e. Biomass)
    pub objective: Option<MathExpression>,
    /// Design optimization target (i.e. Ethanol)
    pub design_objective: Option<MathExpression>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model::default()
    }

    /// Add a reaction to the model, registering any metabolite not yet in the model
    ///
    /// # Examples
    /// ```rust
    /// use bioopt_core::metabolic_model::model::Model;
    /// use bioopt_core::metabolic_model::reaction::{ReactionBuilder, ReactionMember};
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default()
    ///     .name("R1")
    ///     .reactants(ReactionMember::new("A", 1.).unwrap().into())
    ///     .products(ReactionMember::new("B", 1.).unwrap().into())
    ///     .build()
    ///     .unwrap();
    /// model.add_reaction(new_reaction);
    /// assert_eq!(model.find_metabolites().len(), 2);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        for member in reaction.participants() {
            self.register_metabolite(member.metabolite());
        }
        self.reactions.push(reaction);
    }

    fn register_metabolite(&mut self, name: &str) {
        if !self.metabolites.contains_key(name) {
            if let Ok(m) = Metabolite::new(name) {
                self.metabolites.insert(name.to_string(), m);
            }
        }
    }

    /// Metabolite by name
    pub fn metabolite(&self, name: &str) -> Option<&Metabolite> {
        self.metabolites.get(name)
    }

    /// Mutable metabolite by name, changes are visible from every reaction using it
    pub fn metabolite_mut(&mut self, name: &str) -> Option<&mut Metabolite> {
        self.metabolites.get_mut(name)
    }

    /// Set the boundary condition of a metabolite, returns false if it is not in the model
    pub fn set_boundary(&mut self, name: &str, boundary: bool) -> bool {
        match self.metabolites.get_mut(name) {
            Some(m) => {
                m.boundary = boundary;
                true
            }
            None => false,
        }
    }

    /// First reaction with the given name
    pub fn find_reaction(&self, name: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.name() == name)
    }

    pub fn find_reaction_mut(&mut self, name: &str) -> Option<&mut Reaction> {
        self.reactions.iter_mut().find(|r| r.name() == name)
    }

    /// Reactions whose names are in `names`, in model order
    pub fn find_reactions(&self, names: &[&str]) -> Vec<&Reaction> {
        self.reactions
            .iter()
            .filter(|r| names.contains(&r.name()))
            .collect()
    }

    /// Reactions whose names match the pattern, in model order
    pub fn find_reactions_matching(&self, pattern: &Regex) -> Vec<&Reaction> {
        self.reactions
            .iter()
            .filter(|r| pattern.is_match(r.name()))
            .collect()
    }

    /// Metabolite with the given name if it takes part in a reaction
    pub fn find_metabolite(&self, name: &str) -> Option<&Metabolite> {
        self.find_metabolites().into_iter().find(|m| m.name() == name)
    }

    /// Distinct metabolites of all reactions, in order of first appearance
    /// (reactants before products, reactions in model order)
    pub fn find_metabolites(&self) -> Vec<&Metabolite> {
        self.metabolite_names()
            .iter()
            .filter_map(|name| self.metabolites.get(*name))
            .collect()
    }

    /// Metabolites whose names match the pattern, in order of first appearance
    pub fn find_metabolites_matching(&self, pattern: &Regex) -> Vec<&Metabolite> {
        self.find_metabolites()
            .into_iter()
            .filter(|m| pattern.is_match(m.name()))
            .collect()
    }

    /// Imported/exported metabolites
    pub fn find_boundary_metabolites(&self) -> Vec<&Metabolite> {
        self.find_metabolites()
            .into_iter()
            .filter(|m| m.boundary)
            .collect()
    }

    /// Reactions importing or exporting metabolites
    pub fn find_boundary_reactions(&self) -> Vec<&Reaction> {
        self.reactions
            .iter()
            .filter(|r| r.participants().any(|p| self.is_boundary(p.metabolite())))
            .collect()
    }

    fn is_boundary(&self, name: &str) -> bool {
        self.metabolites.get(name).map(|m| m.boundary).unwrap_or(false)
    }

    /// Largest absolute bound of any reaction (0 for an empty model)
    pub fn get_max_bound(&self) -> f64 {
        self.reactions
            .iter()
            .flat_map(|r| [r.bounds.lb().abs(), r.bounds.ub().abs()])
            .fold(0., f64::max)
    }

    fn metabolite_names(&self) -> IndexSet<&str> {
        self.reactions
            .iter()
            .flat_map(|r| r.participants())
            .map(|p| p.metabolite())
            .collect()
    }

    /// Make the metabolite map match the reactions: every metabolite named by a reaction
    /// member gets exactly one entry (existing entries keep their state), entries no reaction
    /// uses are dropped and the map is ordered by first appearance.
    pub fn unify_metabolite_references(&mut self) {
        let mut unified: IndexMap<String, Metabolite> = IndexMap::new();
        for name in self.metabolite_names() {
            let metabolite = match self.metabolites.get(name) {
                Some(m) => m.clone(),
                None => match Metabolite::new(name) {
                    Ok(m) => m,
                    Err(_) => continue, // member names are never empty
                },
            };
            unified.insert(name.to_string(), metabolite);
        }
        self.metabolites = unified;
    }

    /// Point every reaction reference of the objectives at the first reaction with that
    /// name. Returns the names which could not be resolved, in order of appearance.
    pub fn unify_reaction_references(&mut self) -> Vec<String> {
        let mut index: IndexMap<&str, usize> = IndexMap::new();
        for (i, r) in self.reactions.iter().enumerate() {
            index.entry(r.name()).or_insert(i);
        }
        let mut unresolved = Vec::new();
        let mut resolve = |r: &mut ReactionRef| {
            r.index = index.get(r.name()).copied();
            if r.index.is_none() {
                unresolved.push(r.name().to_string());
            }
        };
        if let Some(objective) = self.objective.as_mut() {
            objective.for_each_reaction_mut(&mut resolve);
        }
        if let Some(design_objective) = self.design_objective.as_mut() {
            design_objective.for_each_reaction_mut(&mut resolve);
        }
        unresolved
    }

    /// Unify metabolite and reaction references, see [`Model::unify_metabolite_references`]
    /// and [`Model::unify_reaction_references`]
    pub fn unify_references(&mut self) -> Vec<String> {
        self.unify_metabolite_references();
        self.unify_reaction_references()
    }

    /// Reaction a reference points to, `None` if unresolved or stale
    pub fn resolve(&self, reaction: &ReactionRef) -> Option<&Reaction> {
        reaction
            .index()
            .and_then(|i| self.reactions.get(i))
            .filter(|r| r.name() == reaction.name())
    }

    /// Objective as a map of reaction names to coefficients
    pub fn objective_dict(&self) -> IndexMap<String, f64> {
        Model::extract_objective_dict(self.objective.as_ref())
    }

    /// Design objective as a map of reaction names to coefficients
    pub fn design_objective_dict(&self) -> IndexMap<String, f64> {
        Model::extract_objective_dict(self.design_objective.as_ref())
    }

    /// Flatten a linear objective. Every term is a reaction followed by numbers, the first
    /// number is the coefficient (1 if there is none).
    fn extract_objective_dict(objective: Option<&MathExpression>) -> IndexMap<String, f64> {
        let mut coefficients = IndexMap::new();
        let Some(objective) = objective else {
            return coefficients;
        };
        match objective.operation() {
            Some(Operation::Addition) => {
                for term in objective.operands() {
                    match term {
                        Operand::Expression(exp) => Model::extract_term(exp, &mut coefficients),
                        Operand::Reaction(r) => {
                            coefficients.insert(r.name().to_string(), 1.);
                        }
                        Operand::Number(_) => {}
                    }
                }
            }
            Some(Operation::Multiplication) | None => {
                Model::extract_term(objective, &mut coefficients)
            }
            Some(op) => {
                log::warn!("Objective with top level operation {} is not linear", op);
            }
        }
        coefficients
    }

    fn extract_term(term: &MathExpression, coefficients: &mut IndexMap<String, f64>) {
        let reaction = term.operands().iter().find_map(|o| match o {
            Operand::Reaction(r) => Some(r.name()),
            _ => None,
        });
        let coefficient = term
            .operands()
            .iter()
            .find_map(|o| match o {
                Operand::Number(n) => Some(*n),
                _ => None,
            })
            .unwrap_or(1.);
        if let Some(name) = reaction {
            coefficients.insert(name.to_string(), coefficient);
        }
    }
}

impl PartialEq for Model {
    /// Structural equality: same reactions, same metabolites (with boundary conditions)
    /// and same objectives
    fn eq(&self, other: &Self) -> bool {
        self.reactions == other.reactions
            && self.find_metabolites() == other.find_metabolites()
            && self.objective == other.objective
            && self.design_objective == other.design_objective
    }
}
