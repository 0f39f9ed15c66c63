//! Grammatical Evolution search for closed-form antiderivatives.
//!
//! Genotypes are decoded through a fixed expression grammar; the numerical
//! derivative of each decoded expression is compared with a target function
//! over an interval, with adaptive penalties on genotype length and on the
//! integration constant.

pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use config::{ConfigManager, GeConfig};
pub use engines::experiment::{ExperimentReport, ExperimentRunner};
pub use engines::generation::{run_one_execution, ExecutionResult, StatisticsSink};
pub use error::{GeError, Result};
