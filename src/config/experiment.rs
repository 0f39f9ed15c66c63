use super::traits::ConfigSection;
use crate::error::GeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub executions: usize,
    pub seed: u64,
    pub log_file: String,
    pub summary_file: Option<String>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            executions: 30,
            seed: 42,
            log_file: "problem_1.csv".to_string(),
            summary_file: None,
        }
    }
}

impl ConfigSection for ExperimentConfig {
    fn section_name() -> &'static str {
        "experiment"
    }

    fn validate(&self) -> Result<(), GeError> {
        if self.executions == 0 {
            return Err(GeError::Configuration(
                "At least one execution is required".to_string(),
            ));
        }
        Ok(())
    }
}
