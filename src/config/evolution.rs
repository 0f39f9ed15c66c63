use super::traits::{check_probability, ConfigSection};
use crate::error::GeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_length: usize,
    pub max_gens: usize,

    // Initialization
    pub min_initial_len: usize,
    pub max_initial_len: usize,
    /// Soft bound: exceeding it is penalised, never truncated.
    pub max_genotype_len: usize,

    // Parent selection (annealed from initial to final)
    pub initial_tournament_size: usize,
    pub final_tournament_size: usize,

    pub mating_probability: f64,

    // Mutation probability is annealed from pm_0 down to pm_inf
    pub pm_0: f64,
    pub pm_inf: f64,

    pub duplication_probability: f64,
    pub min_duplication_len: usize,
    pub max_duplication_len: usize,

    pub survival_selection: SurvivalStrategy,
    pub elitism: bool,

    /// Best fitness at or below this value ends the run as a success.
    pub success_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalStrategy {
    Generational,
    MuPlusLambda,
    SteadyState,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_length: 200,
            max_gens: 1500,
            min_initial_len: 10,
            max_initial_len: 20,
            max_genotype_len: 40,
            initial_tournament_size: 5,
            final_tournament_size: 15,
            mating_probability: 0.9,
            pm_0: 0.75,
            pm_inf: 0.15,
            duplication_probability: 0.0,
            min_duplication_len: 0,
            max_duplication_len: 5,
            survival_selection: SurvivalStrategy::SteadyState,
            elitism: true,
            success_threshold: 0.1,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GeError> {
        let section = Self::section_name();
        if self.population_length < 2 || self.population_length % 2 != 0 {
            return Err(GeError::Configuration(format!(
                "Population length must be an even number of at least 2, got {}",
                self.population_length
            )));
        }
        if self.min_initial_len == 0 || self.min_initial_len >= self.max_initial_len {
            return Err(GeError::Configuration(format!(
                "Initial length range [{}, {}) is empty or admits empty genotypes",
                self.min_initial_len, self.max_initial_len
            )));
        }
        if self.initial_tournament_size == 0 || self.final_tournament_size == 0 {
            return Err(GeError::Configuration(
                "Tournament sizes must be at least 1".to_string(),
            ));
        }
        check_probability(section, "mating_probability", self.mating_probability)?;
        check_probability(section, "pm_0", self.pm_0)?;
        check_probability(section, "pm_inf", self.pm_inf)?;
        check_probability(section, "duplication_probability", self.duplication_probability)?;
        Ok(())
    }
}
