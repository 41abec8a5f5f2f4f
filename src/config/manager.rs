use super::{evolution::EvolutionConfig, run::RunConfig, traits::ConfigSection};
use crate::error::CgpError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub run: RunConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), CgpError> {
        self.evolution.validate()?;
        self.run.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML or JSON file, then apply `CGP_`-prefixed environment
    /// overrides such as `CGP_EVOLUTION__POPULATION_SIZE=8`.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CgpError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CGP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CgpError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| CgpError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    pub fn load_from_toml_str(&self, contents: &str) -> Result<(), CgpError> {
        let config: AppConfig = toml::from_str(contents)?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CgpError> {
        let toml_str = toml::to_string_pretty(&self.get())
            .map_err(|e| CgpError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply `f` to a copy; the change is kept only if it validates
    pub fn update<F>(&self, f: F) -> Result<(), CgpError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), CgpError> {
        config.validate()?;
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
