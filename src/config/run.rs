use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::CgpError;
use serde::{Deserialize, Serialize};

/// Limits for driving the generational loop from the outside
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub max_generations: usize,
    /// Stop once the parent's fitness is at or below this value
    pub target_fitness: Option<f64>,
    /// Progress is reported every `log_every` generations
    pub log_every: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_generations: 10_000,
            target_fitness: None,
            log_every: 100,
        }
    }
}

impl ConfigSection for RunConfig {
    fn section_name() -> &'static str {
        "run"
    }

    fn validate(&self) -> Result<(), CgpError> {
        if self.log_every == 0 {
            return Err(CgpError::Configuration(
                "log_every must be at least 1".to_string(),
            ));
        }
        if self.target_fitness.is_some_and(f64::is_nan) {
            return Err(CgpError::Configuration(
                "target_fitness must be a number".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: Self::section_name().to_string(),
            fields: vec![
                FieldManifest::new(
                    "max_generations",
                    "integer",
                    serde_json::json!(defaults.max_generations),
                    Some(0.0),
                    None,
                    "Upper bound on generations per run",
                ),
                FieldManifest::new(
                    "target_fitness",
                    "float",
                    serde_json::json!(defaults.target_fitness),
                    None,
                    None,
                    "Stop when the best fitness reaches this value",
                ),
                FieldManifest::new(
                    "log_every",
                    "integer",
                    serde_json::json!(defaults.log_every),
                    Some(1.0),
                    None,
                    "Generations between progress reports",
                ),
            ],
        }
    }
}
