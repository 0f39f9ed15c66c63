pub mod report;
pub mod runner;

pub use report::{write_json_summary, CsvReport};
pub use runner::{AveragedGeneration, ExperimentReport, ExperimentRunner, ExperimentSummary};
