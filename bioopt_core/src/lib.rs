//! Core rust implementation of BioOpt, a crate for reading, writing and combining constraint
//! based metabolic models in the BioOpt text format.
//!
//! ```rust
//! use bioopt_core::metabolic_model::model::Model;
//! let text = "-REACTIONS\nR1: A + B -> C\nR2: B + C <-> E\n-EXTERNAL METABOLITES\nA\nE\n";
//! let report = Model::from_bioopt_str(text).unwrap();
//! for warning in &report.warnings {
//!     println!("{}", warning);
//! }
//! let model = report.model;
//! assert_eq!(model.find_boundary_metabolites().len(), 2);
//! ```

pub mod configuration;
pub mod io;
pub mod metabolic_model;
mod utils;
