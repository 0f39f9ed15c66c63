use super::traits::{check_probability, ConfigSection};
use crate::error::GeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    pub probability: f64,
    /// Local search runs on generations that are multiples of this.
    pub interval: usize,
    pub n_codons_to_modify: usize,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            probability: 0.9,
            interval: 10,
            n_codons_to_modify: 5,
        }
    }
}

impl ConfigSection for LocalSearchConfig {
    fn section_name() -> &'static str {
        "local_search"
    }

    fn validate(&self) -> Result<(), GeError> {
        check_probability(Self::section_name(), "probability", self.probability)?;
        if self.interval == 0 {
            return Err(GeError::Configuration(
                "local_search.interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
