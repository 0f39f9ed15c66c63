pub mod expression;
pub mod fitness;
pub mod problems;

pub use expression::{NumericFault, Phenotype, PhenotypeError};
pub use fitness::{Evaluation, FitnessEvaluator, PenaltyWeights};
pub use problems::Problem;
