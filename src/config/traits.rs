use crate::error::GeError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), GeError>;
}

pub(crate) fn check_probability(section: &str, name: &str, value: f64) -> Result<(), GeError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GeError::Configuration(format!(
            "{}.{} must be between 0 and 1, got {}",
            section, name, value
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(section: &str, name: &str, value: f64) -> Result<(), GeError> {
    if !(value > 0.0) {
        return Err(GeError::Configuration(format!(
            "{}.{} must be positive, got {}",
            section, name, value
        )));
    }
    Ok(())
}
