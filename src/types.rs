use serde::{Deserialize, Serialize};

use crate::engines::generation::genome::Genotype;

/// Scalar fitness (lower is better) plus the integration-constant feasibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fitness {
    pub value: f64,
    pub feasible: bool,
}

impl Fitness {
    pub fn new(value: f64, feasible: bool) -> Self {
        Self { value, feasible }
    }

    /// The sentinel assigned to anything that failed to decode or evaluate.
    pub fn invalid(invalid_fitness: f64) -> Self {
        Self {
            value: invalid_fitness,
            feasible: false,
        }
    }

    /// NaN never reaches selection: it is remapped to the invalid sentinel.
    pub fn sanitized(self, invalid_fitness: f64) -> Self {
        if self.value.is_nan() {
            Self::invalid(invalid_fitness)
        } else {
            self
        }
    }
}

/// A genotype together with the fitness it was last evaluated to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genotype: Genotype,
    pub fitness: Fitness,
}

impl Individual {
    pub fn new(genotype: Genotype, fitness: Fitness) -> Self {
        Self { genotype, fitness }
    }

    pub fn len(&self) -> usize {
        self.genotype.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genotype.is_empty()
    }
}

/// Summary statistics of one generation, as handed to a `StatisticsSink`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub min_fitness: f64,
    pub mean_fitness: f64,
    pub std_fitness: f64,
    pub min_len: usize,
    pub max_len: usize,
    pub mean_len: f64,
    pub mean_wrap: f64,
    pub std_wrap: f64,
}
