use crate::config::LocalSearchConfig;
use crate::engines::evaluation::fitness::{FitnessEvaluator, PenaltyWeights};
use crate::engines::generation::genome::Genotype;
use crate::types::Individual;
use rand::Rng;

/// Result of refining one individual.
#[derive(Debug, Clone)]
pub struct LocalSearchOutcome {
    pub individual: Individual,
    /// Neighbour evaluations spent, to be charged against the budget.
    pub evaluations: usize,
    /// Wrap counts of every decode performed along the way.
    pub wraps: Vec<usize>,
}

/// Probe codons that choose terminals (operators, functions, literals) by
/// bumping them up by 1, 2 and 3. The best neighbour replaces the individual
/// only if it is strictly better.
pub fn local_search<R: Rng>(
    individual: &Individual,
    evaluator: &FitnessEvaluator,
    weights: &PenaltyWeights,
    config: &LocalSearchConfig,
    rng: &mut R,
) -> LocalSearchOutcome {
    let mut outcome = LocalSearchOutcome {
        individual: individual.clone(),
        evaluations: 0,
        wraps: Vec::new(),
    };

    if rng.gen::<f64>() > config.probability {
        return outcome;
    }

    let terminals = match evaluator.decoder().terminal_codon_indexes(&individual.genotype) {
        Ok(terminals) => terminals,
        Err(err) => {
            outcome.wraps.push(err.wraps());
            return outcome;
        }
    };
    outcome.wraps.push(terminals.wraps);

    if terminals.indexes.is_empty() {
        return outcome;
    }

    let skip = terminals.indexes.len().saturating_sub(config.n_codons_to_modify);
    let neighbourhood: Vec<Genotype> = terminals
        .indexes
        .iter()
        .skip(skip)
        .flat_map(|&idx| {
            (1..=3).map(move |step| {
                let mut neighbour = individual.genotype.clone();
                neighbour[idx] = neighbour[idx].saturating_add(step);
                neighbour
            })
        })
        .collect();

    let evaluations = evaluator.score_batch(&neighbourhood, weights);
    outcome.evaluations = evaluations.len();
    outcome.wraps.extend(evaluations.iter().map(|e| e.wraps));

    let best = evaluations
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, e)| match best {
            Some((_, value)) if value <= e.fitness.value => best,
            _ => Some((i, e.fitness.value)),
        });

    if let Some((best_idx, best_value)) = best {
        if best_value < individual.fitness.value {
            log::trace!(
                "Local search improved fitness {} -> {}",
                individual.fitness.value,
                best_value
            );
            outcome.individual = Individual::new(
                neighbourhood[best_idx].clone(),
                evaluations[best_idx].fitness,
            );
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FitnessConfig;
    use crate::engines::generation::decoder::GrammarDecoder;
    use crate::engines::generation::grammar::Grammar;
    use crate::types::Fitness;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn evaluator() -> FitnessEvaluator {
        let config = FitnessConfig::default();
        let decoder = GrammarDecoder::new(Arc::new(Grammar::standard().unwrap()), config.max_wraps);
        FitnessEvaluator::new(decoder, config, 40).unwrap()
    }

    fn config(probability: f64) -> LocalSearchConfig {
        LocalSearchConfig {
            probability,
            ..Default::default()
        }
    }

    #[test]
    fn improves_literal_towards_integration_constant() {
        // expr -> <var> -> <integer> -> 2.0. Only the literal codon is a
        // terminal choice; bumping it by 3 reaches 5.0, which satisfies
        // F(0) = 5 for problem 1 at no extra integration error.
        let evaluator = evaluator();
        let weights = PenaltyWeights::new(1.0, 1.0);
        let genotype = vec![3, 1, 1];
        assert_eq!(evaluator.decoder().decode(&genotype).unwrap().expression, "2.0");

        let fitness = evaluator.score(&genotype, &weights).fitness;
        let individual = Individual::new(genotype, fitness);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = local_search(&individual, &evaluator, &weights, &config(1.0), &mut rng);

        assert_eq!(outcome.evaluations, 3);
        assert_eq!(outcome.individual.genotype, vec![3, 1, 4]);
        assert!(outcome.individual.fitness.value < individual.fitness.value);
        assert!(outcome.individual.fitness.feasible);
    }

    #[test]
    fn only_highest_terminal_positions_are_probed() {
        // "x+2.0": terminal codons sit at 3 (operator) and 6 (literal).
        let evaluator = evaluator();
        let weights = PenaltyWeights::new(1.0, 1.0);
        let genotype = vec![0, 3, 0, 0, 3, 1, 1];
        assert_eq!(evaluator.decoder().decode(&genotype).unwrap().expression, "x+2.0");
        let individual = Individual::new(genotype, Fitness::invalid(500_000.0));
        let mut rng = StdRng::seed_from_u64(1);

        let limited = LocalSearchConfig {
            n_codons_to_modify: 1,
            ..config(1.0)
        };
        let outcome = local_search(&individual, &evaluator, &weights, &limited, &mut rng);

        assert_eq!(outcome.evaluations, 3);
        assert_eq!(&outcome.individual.genotype[..6], &[0, 3, 0, 0, 3, 1]);
        assert_eq!(outcome.individual.genotype[6], 4);
    }

    #[test]
    fn never_returns_a_worse_individual() {
        let evaluator = evaluator();
        let weights = PenaltyWeights::new(1.0, 1.0);
        let individual = Individual::new(vec![3, 0], Fitness::new(0.0, true));
        let mut rng = StdRng::seed_from_u64(2);

        let outcome = local_search(&individual, &evaluator, &weights, &config(1.0), &mut rng);
        assert_eq!(outcome.individual, individual);
    }

    #[test]
    fn zero_probability_costs_nothing() {
        let evaluator = evaluator();
        let weights = PenaltyWeights::new(1.0, 1.0);
        let individual = Individual::new(vec![0, 3, 0, 0, 3, 1, 1], Fitness::new(10.0, false));
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = local_search(&individual, &evaluator, &weights, &config(0.0), &mut rng);
        assert_eq!(outcome.evaluations, 0);
        assert_eq!(outcome.individual, individual);
        assert!(outcome.wraps.is_empty());
    }

    #[test]
    fn undecodable_individual_is_returned_unchanged() {
        let evaluator = evaluator();
        let weights = PenaltyWeights::new(1.0, 1.0);
        let individual = Individual::new(vec![0; 6], Fitness::invalid(500_000.0));
        let mut rng = StdRng::seed_from_u64(4);

        let outcome = local_search(&individual, &evaluator, &weights, &config(1.0), &mut rng);
        assert_eq!(outcome.evaluations, 0);
        assert_eq!(outcome.individual, individual);
    }
}
