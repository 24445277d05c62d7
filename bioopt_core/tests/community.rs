use std::fs;
use std::path::PathBuf;

use bioopt_core::metabolic_model::commune::{CommuneOptions, CommuneOptionsBuilder};
use bioopt_core::metabolic_model::model::Model;
use bioopt_core::metabolic_model::reaction::Direction;
use serde_json::Value;

fn toy_model() -> Model {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join("test_models")
        .join("toy.bioopt");
    Model::read_bioopt(path).unwrap().model
}

fn community() -> Model {
    Model::commune(&[toy_model(), toy_model()], &CommuneOptions::default()).unwrap()
}

#[test]
fn parsed_models_exchange_through_environment() {
    let community = community();
    assert_eq!(community.reactions.len(), 20);
    assert!(community.objective.is_none());
    assert!(community.design_objective.is_none());

    let boundary: Vec<&str> = community
        .find_boundary_metabolites()
        .iter()
        .map(|m| m.name())
        .collect();
    assert_eq!(boundary, vec!["ENV_glc_extX", "ENV_etoh_extX"]);
    // Former boundary metabolites are balanced inside the community
    assert!(!community.metabolite("ML0000_glc_e").unwrap().boundary);
    assert!(!community.metabolite("ML0001_etoh_e").unwrap().boundary);

    let uptake = community.find_reaction("ML0001_GLCt").unwrap();
    assert_eq!(uptake.direction, Direction::Forward);
    assert_eq!(uptake.bounds.ub(), 10.);
    assert_eq!(uptake.reactants[0].metabolite(), "ML0001_glc_e");

    let secretion = community.find_reaction("ML0000_OUT_etoh_e").unwrap();
    assert_eq!(secretion.reactants[0].metabolite(), "ML0000_etoh_e");
    assert_eq!(secretion.products[0].metabolite(), "ENV_etoh_e");
}

#[test]
fn community_survives_bioopt_round_trip() {
    let community = community();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("community.bioopt");
    community.write_bioopt(&path).unwrap();

    let report = Model::read_bioopt(&path).unwrap();
    // Objective sections are not written for a community
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.model, community);
}

#[test]
fn blocking_uptake_of_one_member() {
    let options = CommuneOptionsBuilder::default()
        .block(vec!["^ML0001_IN_glc_e$".to_string()])
        .build()
        .unwrap();
    let community = Model::commune(&[toy_model(), toy_model()], &options).unwrap();
    assert_eq!(community.reactions.len(), 19);
    assert!(community.find_reaction("ML0000_IN_glc_e").is_some());
    assert!(community.find_reaction("ML0001_IN_glc_e").is_none());
}

#[test]
fn community_exports() {
    let community = community();
    let dir = tempfile::tempdir().unwrap();

    let prefix = dir.path().join("community");
    community.write_optflux(&prefix).unwrap();
    let mets = fs::read_to_string(dir.path().join("community.mets")).unwrap();
    assert_eq!(mets.lines().count(), 16);
    let constr = fs::read_to_string(dir.path().join("community.constr")).unwrap();
    assert_eq!(constr.lines().count(), 20);
    assert!(constr.contains("ML0000_GLCt\t0\t10\n"));
    assert!(constr.contains("ENV_glc_extO\t0\t1000\n"));
    let stoich = fs::read_to_string(dir.path().join("community.stoich")).unwrap();
    assert_eq!(stoich.lines().count(), 16);
    assert!(stoich.lines().all(|row| row.split('\t').count() == 20));

    let matrix = community.stoichiometric_matrix();
    assert_eq!((matrix.nrows(), matrix.ncols()), (16, 20));

    let path = dir.path().join("community.json");
    community.write_cobra_json(&path).unwrap();
    let json: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    // Only the two xtX metabolites are boundary
    assert_eq!(json["metabolites"].as_array().unwrap().len(), 14);
    let reactions = json["reactions"].as_array().unwrap();
    assert_eq!(reactions.len(), 20);
    let exchange = reactions
        .iter()
        .find(|r| r["id"] == "ENV_glc_extO")
        .unwrap();
    assert_eq!(exchange["metabolites"].as_object().unwrap().len(), 1);
    assert_eq!(exchange["metabolites"]["ENV_glc_e"], -1.);
}
