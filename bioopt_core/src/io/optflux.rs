//! Export of the stoichiometric matrix and the OptFlux text files
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use nalgebra::DMatrix;
use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csc::CscMatrix;
use thiserror::Error;

use crate::io::bioopt::writer::WriterOptions;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::ModelError;

/// Contents of the three OptFlux files of a model
#[derive(Debug, Clone, PartialEq)]
pub struct OptFluxFiles {
    /// One metabolite name per line
    pub mets: String,
    /// `name\tlb\tub` per reaction, effective bounds
    pub constr: String,
    /// Dense stoichiometric matrix, one tab separated row per metabolite
    pub stoich: String,
}

#[derive(Error, Debug)]
pub enum OptFluxError {
    #[error("Invalid reaction bounds")]
    InvalidBounds(#[from] ModelError),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

impl Model {
    /// Sparse stoichiometric matrix
    ///
    /// Rows follow [`Model::find_metabolites`], columns follow [`Model::reactions`].
    /// Reactants have negative, products positive coefficients. A metabolite on both sides
    /// of a reaction gets the net coefficient.
    pub fn stoichiometric_matrix(&self) -> CscMatrix<f64> {
        let rows: IndexMap<&str, usize> = self
            .find_metabolites()
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name(), i))
            .collect();
        let mut coo = CooMatrix::new(rows.len(), self.reactions.len());
        for (j, r) in self.reactions.iter().enumerate() {
            for (members, sign) in [(&r.reactants, -1.), (&r.products, 1.)] {
                for member in members {
                    if let Some(&i) = rows.get(member.metabolite()) {
                        coo.push(i, j, sign * member.coefficient());
                    }
                }
            }
        }
        // Duplicate entries are summed
        CscMatrix::from(&coo)
    }

    /// Render the OptFlux files with default options
    pub fn to_optflux(&self) -> Result<OptFluxFiles, OptFluxError> {
        self.to_optflux_with(&WriterOptions::default())
    }

    /// Render the OptFlux files, infinite bounds are written as `±options.inf`
    pub fn to_optflux_with(&self, options: &WriterOptions) -> Result<OptFluxFiles, OptFluxError> {
        let mut mets = String::new();
        for m in self.find_metabolites() {
            mets.push_str(m.name());
            mets.push('\n');
        }

        let mut constr = String::new();
        for r in &self.reactions {
            let (lb, ub) = r.find_effective_bounds()?.finite(options.inf);
            constr.push_str(&format!("{}\t{}\t{}\n", r.name(), lb, ub));
        }

        let dense: DMatrix<f64> = DMatrix::from(&self.stoichiometric_matrix());
        let mut stoich = String::new();
        for row in dense.row_iter() {
            let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            stoich.push_str(&values.join("\t"));
            stoich.push('\n');
        }

        Ok(OptFluxFiles {
            mets,
            constr,
            stoich,
        })
    }

    /// Write `<prefix>.mets`, `<prefix>.constr` and `<prefix>.stoich`
    pub fn write_optflux<P: AsRef<Path>>(&self, prefix: P) -> Result<(), OptFluxError> {
        let files = self.to_optflux()?;
        let prefix = prefix.as_ref();
        fs::write(with_suffix(prefix, ".mets"), files.mets)?;
        fs::write(with_suffix(prefix, ".constr"), files.constr)?;
        fs::write(with_suffix(prefix, ".stoich"), files.stoich)?;
        Ok(())
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}
