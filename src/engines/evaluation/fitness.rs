use crate::config::FitnessConfig;
use crate::engines::evaluation::{expression::Phenotype, problems::Problem};
use crate::engines::generation::{decoder::GrammarDecoder, genome::Codon};
use crate::error::GeError;
use crate::types::Fitness;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Adaptive penalty weights. Written only by the restriction controller;
/// the evaluator always works from an immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    pub lambda_genotype_len: f64,
    pub lambda_integration_const: f64,
    /// Incremented by the restriction controller each time a weight changes.
    pub version: u64,
}

impl PenaltyWeights {
    pub fn new(lambda_genotype_len: f64, lambda_integration_const: f64) -> Self {
        Self {
            lambda_genotype_len,
            lambda_integration_const,
            version: 0,
        }
    }
}

/// Fitness plus the wrap count of the decode that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub fitness: Fitness,
    pub wraps: usize,
}

pub struct FitnessEvaluator {
    decoder: GrammarDecoder,
    problem: Problem,
    config: FitnessConfig,
    max_genotype_len: usize,
    n_samples: usize,
}

impl FitnessEvaluator {
    pub fn new(
        decoder: GrammarDecoder,
        config: FitnessConfig,
        max_genotype_len: usize,
    ) -> Result<Self, GeError> {
        let problem = config.problem()?;
        let (a, b) = problem.interval();
        let n_samples = ((b - a) * config.samples_per_unit as f64).round() as usize;

        Ok(Self {
            decoder,
            problem,
            config,
            max_genotype_len,
            n_samples,
        })
    }

    pub fn decoder(&self) -> &GrammarDecoder {
        &self.decoder
    }

    pub fn problem(&self) -> Problem {
        self.problem
    }

    /// Number of sub-intervals; the error is averaged over `n + 1` points.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Raw evaluation. The returned value may be NaN when the phenotype
    /// overflows without faulting; see `score`.
    pub fn evaluate(&self, genotype: &[Codon], weights: &PenaltyWeights) -> Evaluation {
        let invalid = Fitness::invalid(self.config.invalid_fitness);

        let decoded = match self.decoder.decode(genotype) {
            Ok(decoded) => decoded,
            Err(err) => {
                return Evaluation {
                    fitness: invalid,
                    wraps: err.wraps(),
                }
            }
        };

        let fitness = match Phenotype::parse(&decoded.expression) {
            Ok(phenotype) => self.evaluate_phenotype(&phenotype, genotype.len(), weights),
            Err(err) => {
                log::warn!("Decoded phenotype {:?} failed to parse: {}", decoded.expression, err);
                invalid
            }
        };

        Evaluation {
            fitness,
            wraps: decoded.wraps,
        }
    }

    /// Evaluation with NaN remapped to the invalid sentinel.
    pub fn score(&self, genotype: &[Codon], weights: &PenaltyWeights) -> Evaluation {
        let evaluation = self.evaluate(genotype, weights);
        Evaluation {
            fitness: evaluation.fitness.sanitized(self.config.invalid_fitness),
            ..evaluation
        }
    }

    /// Score a batch in parallel against one weight snapshot. Output order
    /// matches input order.
    pub fn score_batch<G>(&self, genotypes: &[G], weights: &PenaltyWeights) -> Vec<Evaluation>
    where
        G: AsRef<[Codon]> + Sync,
    {
        genotypes
            .par_iter()
            .map(|genotype| self.score(genotype.as_ref(), weights))
            .collect()
    }

    /// Weighted integration error of `phenotype` plus both penalties.
    pub fn evaluate_phenotype(
        &self,
        phenotype: &Phenotype,
        genotype_len: usize,
        weights: &PenaltyWeights,
    ) -> Fitness {
        let invalid = Fitness::invalid(self.config.invalid_fitness);
        let (a, b) = self.problem.interval();
        let delta_x = (b - a) / self.n_samples as f64;

        let mut sum = 0.0;
        for i in 0..=self.n_samples {
            let x = a + i as f64 * delta_x;
            let fx = self.problem.target(x);

            let derivative = match phenotype.forward_derivative(x, self.config.h) {
                Ok(d) => d,
                Err(_) => return invalid,
            };

            let absolute_difference = (derivative - fx).abs();
            let weight = if absolute_difference <= self.config.u {
                self.config.k0
            } else {
                self.config.k1
            };
            sum += weight * absolute_difference;
        }

        if sum > self.config.invalid_fitness {
            return invalid;
        }

        let integration_penalty = match self.integration_constant_penalty(phenotype, weights) {
            Some(penalty) => penalty,
            None => return invalid,
        };

        let value = sum / (self.n_samples + 1) as f64
            + self.genotype_len_penalty(genotype_len, weights)
            + integration_penalty;

        Fitness::new(value, integration_penalty == 0.0)
    }

    fn genotype_len_penalty(&self, genotype_len: usize, weights: &PenaltyWeights) -> f64 {
        let excess = genotype_len.saturating_sub(self.max_genotype_len) as f64;
        (weights.lambda_genotype_len * excess).min(self.config.invalid_fitness)
    }

    /// `None` when the phenotype faults at zero.
    fn integration_constant_penalty(&self, phenotype: &Phenotype, weights: &PenaltyWeights) -> Option<f64> {
        let at_zero = phenotype.eval(0.0).ok()?;
        let hx = (at_zero - self.problem.integration_constant()).abs();
        let violation = (hx - self.config.integration_constant_tolerance).max(0.0);
        Some((weights.lambda_integration_const * violation).min(self.config.invalid_fitness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::problems::tests::antiderivative_text;
    use crate::engines::generation::grammar::Grammar;
    use std::sync::Arc;

    fn evaluator(problem: u8) -> FitnessEvaluator {
        let config = FitnessConfig {
            problem,
            ..Default::default()
        };
        let decoder = GrammarDecoder::new(Arc::new(Grammar::standard().unwrap()), config.max_wraps);
        FitnessEvaluator::new(decoder, config, 40).unwrap()
    }

    fn weights() -> PenaltyWeights {
        PenaltyWeights::new(1.0, 1.0)
    }

    #[test]
    fn sample_count_follows_interval_width() {
        assert_eq!(evaluator(1).n_samples(), 50);
        assert_eq!(evaluator(3).n_samples(), 40);
        assert_eq!(evaluator(4).n_samples(), 20);
    }

    #[test]
    fn exact_antiderivatives_score_near_zero() {
        for problem in Problem::ALL {
            let evaluator = evaluator(problem.id());
            let phenotype = Phenotype::parse(antiderivative_text(problem)).unwrap();
            let fitness = evaluator.evaluate_phenotype(&phenotype, 20, &weights());
            assert!(fitness.value < 0.01, "{:?} scored {}", problem, fitness.value);
            assert!(fitness.feasible, "{:?} should satisfy F(0)", problem);
        }
    }

    #[test]
    fn division_by_zero_genotype_is_invalid() {
        // Decodes to "1.0/x", which faults at x = 0.
        let genotype = [0, 3, 1, 0, 3, 3, 0];
        let evaluator = evaluator(1);
        assert_eq!(
            evaluator.decoder().decode(&genotype).unwrap().expression,
            "1.0/x"
        );
        let evaluation = evaluator.evaluate(&genotype, &weights());
        assert_eq!(evaluation.fitness, Fitness::invalid(500_000.0));
    }

    #[test]
    fn decode_failure_is_invalid_and_reports_wraps() {
        let evaluation = evaluator(1).evaluate(&[0; 6], &weights());
        assert_eq!(evaluation.fitness, Fitness::invalid(500_000.0));
        assert_eq!(evaluation.wraps, 6);
    }

    #[test]
    fn length_penalty_applies_past_max_len() {
        let evaluator = evaluator(1);
        let phenotype = Phenotype::parse(antiderivative_text(Problem::Quadratic)).unwrap();
        let short = evaluator.evaluate_phenotype(&phenotype, 40, &weights());
        let long = evaluator.evaluate_phenotype(&phenotype, 45, &PenaltyWeights::new(2.0, 1.0));
        assert!((long.value - short.value - 10.0).abs() < 1e-9);
        assert!(long.feasible);
    }

    #[test]
    fn integration_constant_violation_is_penalised_and_infeasible() {
        let evaluator = evaluator(1);
        let phenotype = Phenotype::parse("2.0*x*x*x").unwrap();
        let fitness = evaluator.evaluate_phenotype(&phenotype, 10, &weights());
        assert!(!fitness.feasible);
        // |0 - 5| - 0.1 = 4.9 on top of a near-zero integration error
        assert!((fitness.value - 4.9).abs() < 0.01);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let evaluator = evaluator(6);
        let genotype = [2, 1, 3, 0, 0, 2, 3, 1, 5, 17, 200, 3];
        let first = evaluator.evaluate(&genotype, &weights());
        let second = evaluator.evaluate(&genotype, &weights());
        assert_eq!(first.fitness.value.to_bits(), second.fitness.value.to_bits());
        assert_eq!(first.wraps, second.wraps);
    }

    #[test]
    fn batch_matches_sequential_scores() {
        let evaluator = evaluator(1);
        let genotypes = vec![vec![3, 0], vec![0, 3, 1, 0, 3, 3, 0], vec![0; 5], vec![2, 2, 3, 0]];
        let batch = evaluator.score_batch(&genotypes, &weights());
        for (genotype, evaluation) in genotypes.iter().zip(&batch) {
            assert_eq!(*evaluation, evaluator.score(genotype, &weights()));
        }
    }
}
