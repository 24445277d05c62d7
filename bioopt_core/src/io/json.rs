//! Module providing export of Models as COBRA JSON
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::ModelError;
use crate::utils::ids::unique_sbml_id;

// region JSON Model
/// Represents a JSON serialized model in the schema used by cobrapy
#[derive(Serialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    genes: Vec<JsonGene>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<String>,
}

#[derive(Serialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    gene_reaction_rule: String,
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

/// BioOpt models carry no genes, the list is always empty
#[derive(Serialize)]
struct JsonGene {
    id: String,
    name: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
impl Model {
    /// Render the model as COBRA JSON
    ///
    /// Boundary metabolites are left out, so exchange reactions end up with a single side.
    /// Identifiers are derived from the names (only ASCII letters, digits and `_`, made
    /// unique with `_1`, `_2`, ...), the BioOpt names are kept in `name`. Bounds are the
    /// effective bounds with infinite values replaced by the configured `inf`.
    pub fn to_cobra_json(&self) -> Result<String, JsonError> {
        let json_model = self.to_json()?;
        Ok(serde_json::to_string(&json_model)?)
    }

    pub fn write_cobra_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let model_string = self.to_cobra_json()?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn to_json(&self) -> Result<JsonModel, JsonError> {
        let (inf, compartment_pattern) = {
            let config = CONFIGURATION.read().unwrap();
            (config.inf, Regex::new(&config.compartment_pattern)?)
        };
        let mut used_ids: HashSet<String> = HashSet::new();

        let mut metabolite_ids: IndexMap<&str, String> = IndexMap::new();
        let mut compartments: IndexMap<String, String> = IndexMap::new();
        let mut json_metabolites: Vec<JsonMetabolite> = Vec::new();
        for m in self.find_metabolites().into_iter().filter(|m| !m.boundary) {
            let id = unique_sbml_id(m.name(), &mut used_ids);
            let compartment = compartment_pattern
                .captures(m.name())
                .and_then(|c| c.get(1))
                .map(|c| c.as_str().to_string());
            if let Some(c) = &compartment {
                compartments.entry(c.clone()).or_insert_with(|| c.clone());
            }
            json_metabolites.push(JsonMetabolite {
                id: id.clone(),
                name: Some(m.name().to_string()),
                compartment,
                charge: None,
                formula: None,
                notes: None,
                annotation: None,
            });
            metabolite_ids.insert(m.name(), id);
        }

        let objective = self.objective_dict();
        let mut json_reactions: Vec<JsonReaction> = Vec::new();
        for r in &self.reactions {
            let mut metabolites: IndexMap<String, f64> = IndexMap::new();
            let sides = [(&r.reactants, -1.), (&r.products, 1.)];
            for (members, sign) in sides {
                for member in members {
                    // Boundary metabolites have no id
                    if let Some(id) = metabolite_ids.get(member.metabolite()) {
                        *metabolites.entry(id.clone()).or_insert(0.) += sign * member.coefficient();
                    }
                }
            }
            let (lower_bound, upper_bound) = r.find_effective_bounds()?.finite(inf);
            json_reactions.push(JsonReaction {
                id: unique_sbml_id(r.name(), &mut used_ids),
                name: Some(r.name().to_string()),
                metabolites,
                lower_bound,
                upper_bound,
                gene_reaction_rule: String::new(),
                objective_coefficient: objective.get(r.name()).copied(),
                subsystem: None,
                notes: None,
                annotation: None,
            })
        }

        Ok(JsonModel {
            metabolites: json_metabolites,
            reactions: json_reactions,
            genes: Vec::new(),
            id: None,
            compartments: if compartments.is_empty() {
                None
            } else {
                Some(compartments)
            },
            version: Some(String::from("1")),
        })
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Invalid compartment pattern")]
    InvalidCompartmentPattern(#[from] regex::Error),
    #[error("Invalid reaction bounds")]
    InvalidBounds(#[from] ModelError),
    #[error("Serde json error")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

// endregion Conversions

#[cfg(test)]
mod json_tests {
    use super::*;
    use std::path::PathBuf;

    fn toy_model() -> Model {
        let data_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("test_models")
            .join("toy.bioopt");
        Model::read_bioopt(data_path).unwrap().model
    }

    fn find<'a>(items: &'a Value, id: &str) -> &'a Value {
        items
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["id"] == id)
            .unwrap()
    }

    #[test]
    fn json_export() {
        let model = toy_model();
        let json: Value = serde_json::from_str(&model.to_cobra_json().unwrap()).unwrap();

        // Boundary metabolites glc_e and etoh_e are left out
        let metabolites: Vec<&str> = json["metabolites"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_str().unwrap())
            .collect();
        assert_eq!(metabolites, vec!["glc_c", "pyr_c", "atp_c", "etoh_c"]);
        let glc = find(&json["metabolites"], "glc_c");
        assert_eq!(glc["compartment"], "c");
        assert_eq!(json["compartments"]["c"], "c");

        let uptake = find(&json["reactions"], "GLCt");
        assert_eq!(uptake["metabolites"].as_object().unwrap().len(), 1);
        assert_eq!(uptake["metabolites"]["glc_c"], 1.);
        assert_eq!(uptake["lower_bound"], 0.);
        assert_eq!(uptake["upper_bound"], 10.);

        let glycolysis = find(&json["reactions"], "GLYC");
        assert_eq!(glycolysis["metabolites"]["glc_c"], -1.);
        assert_eq!(glycolysis["metabolites"]["pyr_c"], 2.);
        assert_eq!(glycolysis["lower_bound"], -1000.);
        assert_eq!(glycolysis["upper_bound"], 1000.);
        assert_eq!(glycolysis["objective_coefficient"], Value::Null);

        let fermentation = find(&json["reactions"], "FERM");
        assert_eq!(fermentation["objective_coefficient"], 1.);
        assert!(json["genes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn json_ids_are_unique() {
        let model = Model::from_bioopt_str("-REACTIONS\nR-1: A+ -> A-\nR+1: A- -> B\n")
            .unwrap()
            .model;
        let json: Value = serde_json::from_str(&model.to_cobra_json().unwrap()).unwrap();
        let ids: Vec<&str> = json["metabolites"]
            .as_array()
            .unwrap()
            .iter()
            .chain(json["reactions"].as_array().unwrap())
            .map(|m| m["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["A", "A_1", "B", "R_1", "R_1_1"]);
    }

    #[test]
    fn write_json_file() {
        let model = toy_model();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy.json");
        model.write_cobra_json(&path).unwrap();
        let json: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["reactions"].as_array().unwrap().len(), 4);
    }
}
