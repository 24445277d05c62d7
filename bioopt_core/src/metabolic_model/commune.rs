//! Merging of several models into a single community model sharing one environment
use derive_builder::Builder;
use indexmap::IndexSet;
use regex::Regex;
use thiserror::Error;

use crate::configuration::{format_model_tag, CONFIGURATION};
use crate::metabolic_model::bounds::Bounds;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Direction, Reaction, ReactionMember};
use crate::metabolic_model::ModelError;

/// Options for [`Model::commune`], defaults are read from the configuration
#[derive(Builder, Debug, Clone)]
pub struct CommuneOptions {
    /// Start of the per model tag, followed by the zero padded model index and `_`
    #[builder(setter(into), default = "CONFIGURATION.read().unwrap().model_prefix.clone()")]
    pub model_prefix: String,
    #[builder(default = "CONFIGURATION.read().unwrap().model_prefix_width")]
    pub model_prefix_width: usize,
    /// Prefix of the shared environment metabolites
    #[builder(setter(into), default = "CONFIGURATION.read().unwrap().env_prefix.clone()")]
    pub env_prefix: String,
    /// Regular expressions, any reaction of the community whose name matches one of them
    /// is left out
    #[builder(default)]
    pub block: Vec<String>,
}

impl Default for CommuneOptions {
    fn default() -> Self {
        let config = CONFIGURATION.read().unwrap();
        CommuneOptions {
            model_prefix: config.model_prefix.clone(),
            model_prefix_width: config.model_prefix_width,
            env_prefix: config.env_prefix.clone(),
            block: Vec::new(),
        }
    }
}

impl CommuneOptions {
    /// Tag of the model at `index`, i.e. `ML0001_`
    pub fn model_tag(&self, index: usize) -> String {
        format_model_tag(&self.model_prefix, self.model_prefix_width, index)
    }
}

#[derive(Error, Debug)]
pub enum CommuneError {
    #[error("Invalid block pattern")]
    InvalidBlockPattern(#[from] regex::Error),
    #[error("Unable to build commune options")]
    InvalidOptions(#[from] CommuneOptionsBuilderError),
    #[error("Unable to build community reaction")]
    InvalidReaction(#[from] ModelError),
}

impl Model {
    /// Merge models into a community model whose members exchange metabolites through a
    /// shared environment
    ///
    /// Every reaction and metabolite of model `i` gets the tag of model `i` in front of its name
    /// (`ML0000_R1`). For every boundary metabolite `m` of model `i` two forward reactions
    /// connect the now internal `ML000i_m` with the shared `ENV_m`:
    /// `ML000i_OUT_m: ML000i_m -> ENV_m` and `ML000i_IN_m: ENV_m -> ML000i_m`.
    /// Finally every `ENV_m` is connected to the boundary metabolite `ENV_mxtX` through
    /// `ENV_mxtO: ENV_m -> ENV_mxtX` and `ENV_mxtI: ENV_mxtX -> ENV_m`.
    ///
    /// The input models are not modified. The community model has no objectives.
    ///
    /// # Examples
    /// ```rust
    /// use bioopt_core::metabolic_model::model::Model;
    /// use bioopt_core::metabolic_model::commune::CommuneOptions;
    /// let m1 = Model::from_bioopt_str("-REACTIONS\nR1: A -> B\n-EXTERNAL METABOLITES\nA\n").unwrap().model;
    /// let m2 = m1.clone();
    /// let community = Model::commune(&[m1, m2], &CommuneOptions::default()).unwrap();
    /// assert!(community.find_reaction("ML0001_IN_A").is_some());
    /// assert!(community.metabolite("ENV_AxtX").unwrap().boundary);
    /// ```
    pub fn commune(models: &[Model], options: &CommuneOptions) -> Result<Model, CommuneError> {
        let block = options
            .block
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<Regex>, regex::Error>>()?;
        let is_blocked = |name: &str| block.iter().any(|pattern| pattern.is_match(name));

        let mut community = Model::new_empty();
        let mut environment: IndexSet<String> = IndexSet::new();
        let mut blocked = 0usize;
        for (i, model) in models.iter().enumerate() {
            let tag = options.model_tag(i);
            let mut env_reactions = Vec::new();
            for m in model.find_boundary_metabolites() {
                let local = format!("{}{}", tag, m.name());
                let shared = format!("{}{}", options.env_prefix, m.name());
                env_reactions.push(transport(
                    format!("{}OUT_{}", tag, m.name()),
                    &local,
                    &shared,
                )?);
                env_reactions.push(transport(format!("{}IN_{}", tag, m.name()), &shared, &local)?);
                environment.insert(shared);
            }

            let mut reactions = Vec::with_capacity(model.reactions.len() + env_reactions.len());
            for r in &model.reactions {
                let mut r = r.clone();
                let name = format!("{}{}", tag, r.name());
                r.set_name(name)?;
                for member in r.reactants.iter_mut().chain(r.products.iter_mut()) {
                    let name = format!("{}{}", tag, member.metabolite());
                    member.set_metabolite(name)?;
                }
                reactions.push(r);
            }
            reactions.extend(env_reactions);

            for r in reactions {
                if is_blocked(r.name()) {
                    log::debug!("Blocked reaction {} left out of community", r.name());
                    blocked += 1;
                    continue;
                }
                community.reactions.push(r);
            }
        }
        // Every renamed metabolite starts out internal
        community.unify_references();

        for shared in &environment {
            let exchange = format!("{}xtX", shared);
            for r in [
                transport(format!("{}xtO", shared), shared, &exchange)?,
                transport(format!("{}xtI", shared), &exchange, shared)?,
            ] {
                if is_blocked(r.name()) {
                    log::debug!("Blocked reaction {} left out of community", r.name());
                    blocked += 1;
                    continue;
                }
                community.add_reaction(r);
            }
            community.set_boundary(&exchange, true);
        }

        log::info!(
            "Merged {} models into a community with {} reactions and {} environment metabolites ({} reactions blocked)",
            models.len(),
            community.reactions.len(),
            environment.len(),
            blocked
        );
        Ok(community)
    }
}

/// Forward reaction moving one unit of `from` to `to`
fn transport(name: String, from: &str, to: &str) -> Result<Reaction, ModelError> {
    Reaction::new(
        name,
        ReactionMember::new(from, 1.)?.into(),
        ReactionMember::new(to, 1.)?.into(),
        Some(Direction::Forward),
        Some(Bounds::forward()),
    )
}
