//! Process wide defaults used when reading, writing and merging BioOpt models
use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

#[derive(Debug, Clone)]
pub struct Configuration {
    /// Finite stand-in for infinite bounds, BioOpt text has no infinity literal
    pub inf: f64,
    /// Tag placed in front of every reaction and metabolite of a communed model
    pub model_prefix: String,
    /// Zero padded width of the model index following `model_prefix`
    pub model_prefix_width: usize,
    /// Prefix of the metabolites in the shared environment of a community model
    pub env_prefix: String,
    /// Regular expression extracting the compartment from a metabolite name (first group)
    pub compartment_pattern: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            inf: 1000.,
            model_prefix: String::from("ML"),
            model_prefix_width: 4,
            env_prefix: String::from("ENV_"),
            compartment_pattern: String::from(r"_(\w+)$"),
        }
    }
}

impl Configuration {
    /// Prefix for the model with index `index`, i.e. `ML0003_`
    pub fn model_tag(&self, index: usize) -> String {
        format_model_tag(&self.model_prefix, self.model_prefix_width, index)
    }
}

pub(crate) fn format_model_tag(prefix: &str, width: usize, index: usize) -> String {
    format!("{}{:0width$}_", prefix, index, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_tag() {
        let config = Configuration::default();
        assert_eq!(config.model_tag(0), "ML0000_");
        assert_eq!(config.model_tag(12), "ML0012_");
    }

    #[test]
    fn custom_model_tag() {
        let config = Configuration {
            model_prefix: "ORG".to_string(),
            model_prefix_width: 2,
            ..Configuration::default()
        };
        assert_eq!(config.model_tag(3), "ORG03_");
    }
}
