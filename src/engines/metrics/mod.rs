pub mod statistics;

pub use statistics::{generation_stats, mean, sample_std};
