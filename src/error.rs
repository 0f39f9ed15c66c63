use thiserror::Error;

use crate::engines::evaluation::expression::PhenotypeError;
use crate::engines::generation::decoder::DecodeError;
use crate::engines::generation::grammar::GrammarError;

#[derive(Error, Debug)]
pub enum GeError {
    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Phenotype error: {0}")]
    Phenotype(#[from] PhenotypeError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, GeError>;
