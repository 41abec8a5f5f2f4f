use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::generation::GenomeShape;
use crate::error::CgpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// One parent plus `population_size - 1` offspring per generation
    pub population_size: usize,
    pub num_nodes: usize,
    pub mutation_rate: f64,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub max_arity: usize,
    /// Seed for the run's random source; entropy when absent
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            num_nodes: 10,
            mutation_rate: 0.01,
            num_inputs: 3,
            num_outputs: 3,
            max_arity: 2,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), CgpError> {
        if self.population_size < 2 {
            return Err(CgpError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(CgpError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        GenomeShape::from(self).validate()
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: Self::section_name().to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    serde_json::json!(defaults.population_size),
                    Some(2.0),
                    None,
                    "Parent plus offspring evaluated per generation",
                ),
                FieldManifest::new(
                    "num_nodes",
                    "integer",
                    serde_json::json!(defaults.num_nodes),
                    Some(0.0),
                    None,
                    "Number of function nodes in every genome",
                ),
                FieldManifest::new(
                    "mutation_rate",
                    "float",
                    serde_json::json!(defaults.mutation_rate),
                    Some(0.0),
                    Some(1.0),
                    "Fraction of node and output slots mutated per offspring",
                ),
                FieldManifest::new(
                    "num_inputs",
                    "integer",
                    serde_json::json!(defaults.num_inputs),
                    Some(0.0),
                    None,
                    "Length of the program input vector",
                ),
                FieldManifest::new(
                    "num_outputs",
                    "integer",
                    serde_json::json!(defaults.num_outputs),
                    Some(1.0),
                    None,
                    "Length of the program output vector",
                ),
                FieldManifest::new(
                    "max_arity",
                    "integer",
                    serde_json::json!(defaults.max_arity),
                    Some(0.0),
                    None,
                    "Connections per node",
                ),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::Value::Null,
                    Some(0.0),
                    None,
                    "Random seed; omit for a fresh run each time",
                ),
            ],
        }
    }
}
