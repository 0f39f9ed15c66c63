pub mod decoder;
pub mod evolution_engine;
pub mod gene_consumer;
pub mod genome;
pub mod grammar;
pub mod local_search;
pub mod operators;
pub mod progress;
pub mod restrictions;
pub mod survival;

pub use decoder::{DecodeError, Decoded, GrammarDecoder, TerminalCodons};
pub use evolution_engine::{run_one_execution, EvolutionEngine, ExecutionResult};
pub use genome::{Codon, Genotype};
pub use grammar::{Grammar, GrammarError, NonTerminal, Symbol};
pub use progress::{ConsoleProgressCallback, StatisticsCollector, StatisticsSink, TeeSink};
pub use restrictions::RestrictionController;
pub use survival::survival_selection;
