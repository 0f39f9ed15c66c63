use super::traits::{check_positive, ConfigSection};
use crate::engines::evaluation::problems::Problem;
use crate::error::GeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Selects one of the six built-in target functions (1..=6).
    pub problem: u8,
    pub samples_per_unit: usize,
    /// Forward-difference step.
    pub h: f64,
    /// Tolerance under which the cheaper weight `k0` applies.
    pub u: f64,
    pub k0: f64,
    pub k1: f64,
    pub invalid_fitness: f64,
    pub max_wraps: usize,
    pub integration_constant_tolerance: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            problem: 1,
            samples_per_unit: 10,
            h: 0.00001,
            u: 0.1,
            k0: 1.0,
            k1: 10.0,
            invalid_fitness: 500_000.0,
            max_wraps: 5,
            integration_constant_tolerance: 0.1,
        }
    }
}

impl FitnessConfig {
    pub fn problem(&self) -> Result<Problem, GeError> {
        Problem::from_id(self.problem)
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), GeError> {
        let section = Self::section_name();
        self.problem()?;
        if self.samples_per_unit == 0 {
            return Err(GeError::Configuration(
                "samples_per_unit must be at least 1".to_string(),
            ));
        }
        check_positive(section, "h", self.h)?;
        check_positive(section, "invalid_fitness", self.invalid_fitness)?;
        if self.u < 0.0 || self.integration_constant_tolerance < 0.0 {
            return Err(GeError::Configuration(
                "Tolerances must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
