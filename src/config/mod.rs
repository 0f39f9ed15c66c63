pub mod traits;
pub mod evolution;
pub mod fitness;
pub mod restrictions;
pub mod local_search;
pub mod experiment;
pub mod manager;

pub use manager::{ConfigManager, GeConfig};
pub use evolution::{EvolutionConfig, SurvivalStrategy};
pub use fitness::FitnessConfig;
pub use restrictions::RestrictionConfig;
pub use local_search::LocalSearchConfig;
pub use experiment::ExperimentConfig;
