use super::{
    evolution::EvolutionConfig,
    experiment::ExperimentConfig,
    fitness::FitnessConfig,
    local_search::LocalSearchConfig,
    restrictions::RestrictionConfig,
    traits::ConfigSection,
};
use crate::error::GeError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `ANTIDERIV_GE__EVOLUTION__MAX_GENS=50`.
pub const ENV_PREFIX: &str = "ANTIDERIV_GE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeConfig {
    pub evolution: EvolutionConfig,
    pub fitness: FitnessConfig,
    pub restrictions: RestrictionConfig,
    pub local_search: LocalSearchConfig,
    pub experiment: ExperimentConfig,
}

impl GeConfig {
    pub fn validate(&self) -> Result<(), GeError> {
        self.evolution.validate()?;
        self.fitness.validate()?;
        self.restrictions.validate()?;
        self.local_search.validate()?;
        self.experiment.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<GeConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(GeConfig::default())),
        }
    }

    /// Load a TOML file, layering environment overrides on top of it.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GeError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: GeConfig = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GeError> {
        let toml_str = toml::to_string_pretty(&self.get())?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> GeConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), GeError>
    where
        F: FnOnce(&mut GeConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::evolution::SurvivalStrategy;

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ge.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.max_gens = 42;
                c.evolution.survival_selection = SurvivalStrategy::MuPlusLambda;
                c.fitness.problem = 4;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        let config = reloaded.get();
        assert_eq!(config.evolution.max_gens, 42);
        assert_eq!(config.evolution.survival_selection, SurvivalStrategy::MuPlusLambda);
        assert_eq!(config.fitness.problem, 4);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[evolution]\npopulation_length = 20\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get();
        assert_eq!(config.evolution.population_length, 20);
        assert_eq!(config.restrictions.nf, 5);
        assert_eq!(config.fitness.max_wraps, 5);
    }

    #[test]
    fn environment_overrides_file_values() {
        // No other test in this binary asserts on this field.
        let var = format!("{}__LOCAL_SEARCH__N_CODONS_TO_MODIFY", ENV_PREFIX);
        std::env::set_var(&var, "3");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.toml");
        std::fs::write(
            &path,
            "[local_search]\nn_codons_to_modify = 2\ninterval = 4\n",
        )
        .unwrap();

        let manager = ConfigManager::new();
        let result = manager.load_from_file(&path);
        std::env::remove_var(&var);
        result.unwrap();

        let config = manager.get();
        assert_eq!(config.local_search.n_codons_to_modify, 3);
        assert_eq!(config.local_search.interval, 4);
    }

    #[test]
    fn invalid_update_is_rejected_and_not_applied() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.fitness.problem = 9);
        assert!(result.is_err());
        assert_eq!(manager.get().fitness.problem, 1);
    }

    #[test]
    fn unknown_survival_strategy_in_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[evolution]\nsurvival_selection = \"lottery\"\n").unwrap();

        let manager = ConfigManager::new();
        assert!(manager.load_from_file(&path).is_err());
    }
}
