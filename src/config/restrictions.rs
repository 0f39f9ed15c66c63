use super::traits::{check_positive, ConfigSection};
use crate::error::GeError;
use serde::{Deserialize, Serialize};

/// Adaptive penalty-weight control. `beta1` tightens, `beta2` relaxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictionConfig {
    pub nf: usize,
    pub beta1: f64,
    pub beta2: f64,
    pub min_lambda: f64,
    pub max_lambda_len: f64,
    pub max_lambda_integration_const: f64,
    pub initial_lambda_len: f64,
    pub initial_lambda_integration_const: f64,
}

impl Default for RestrictionConfig {
    fn default() -> Self {
        Self {
            nf: 5,
            beta1: 4.0,
            beta2: 2.8,
            min_lambda: 0.1,
            max_lambda_len: 10.0,
            max_lambda_integration_const: 1.0,
            initial_lambda_len: 1.0,
            initial_lambda_integration_const: 1.0,
        }
    }
}

impl ConfigSection for RestrictionConfig {
    fn section_name() -> &'static str {
        "restrictions"
    }

    fn validate(&self) -> Result<(), GeError> {
        let section = Self::section_name();
        if self.nf == 0 {
            return Err(GeError::Configuration("nf must be at least 1".to_string()));
        }
        check_positive(section, "beta1", self.beta1)?;
        check_positive(section, "beta2", self.beta2)?;
        check_positive(section, "min_lambda", self.min_lambda)?;
        if self.min_lambda > self.max_lambda_len || self.min_lambda > self.max_lambda_integration_const {
            return Err(GeError::Configuration(format!(
                "min_lambda {} exceeds a maximum lambda",
                self.min_lambda
            )));
        }
        Ok(())
    }
}
