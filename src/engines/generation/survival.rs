use crate::config::SurvivalStrategy;
use crate::error::GeError;
use crate::types::Individual;
use rand::Rng;
use std::cmp::Ordering;

fn by_fitness(a: &Individual, b: &Individual) -> Ordering {
    a.fitness
        .value
        .partial_cmp(&b.fitness.value)
        .unwrap_or(Ordering::Equal)
}

/// The `k` lowest-fitness individuals, ties kept in input order.
pub fn select_best(mut individuals: Vec<Individual>, k: usize) -> Vec<Individual> {
    individuals.sort_by(by_fitness);
    individuals.truncate(k);
    individuals
}

/// Index of the lowest-fitness individual (first one on ties).
pub fn best_index(individuals: &[Individual]) -> Option<usize> {
    individuals
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| by_fitness(a, b))
        .map(|(i, _)| i)
}

/// Build the next population from the current one and its evaluated offspring.
///
/// Fails with `InvariantViolation` if the strategy cannot produce exactly
/// `population_length` individuals.
pub fn survival_selection<R: Rng>(
    population: Vec<Individual>,
    mut offspring: Vec<Individual>,
    strategy: SurvivalStrategy,
    elitism: bool,
    population_length: usize,
    rng: &mut R,
) -> Result<Vec<Individual>, GeError> {
    let survivors = match strategy {
        SurvivalStrategy::Generational => {
            if elitism && !offspring.is_empty() {
                if let (Some(pop_best), Some(off_best)) = (best_index(&population), best_index(&offspring)) {
                    if population[pop_best].fitness.value < offspring[off_best].fitness.value {
                        let idx = rng.gen_range(0..offspring.len());
                        offspring[idx] = population[pop_best].clone();
                    }
                }
            }
            offspring
        }
        SurvivalStrategy::MuPlusLambda => {
            let mut merged = population;
            merged.extend(offspring);
            select_best(merged, population_length)
        }
        SurvivalStrategy::SteadyState => {
            let from_population = population_length / 2;
            let from_offspring = population_length - from_population;
            let mut survivors = select_best(population, from_population);
            survivors.extend(select_best(offspring, from_offspring));
            survivors
        }
    };

    if survivors.len() != population_length {
        return Err(GeError::InvariantViolation(format!(
            "{:?} survival produced {} individuals, expected {}",
            strategy,
            survivors.len(),
            population_length
        )));
    }

    Ok(survivors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fitness;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn individuals(fitnesses: &[f64], tag: u32) -> Vec<Individual> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| Individual::new(vec![tag, i as u32], Fitness::new(f, true)))
            .collect()
    }

    const STRATEGIES: [SurvivalStrategy; 3] = [
        SurvivalStrategy::Generational,
        SurvivalStrategy::MuPlusLambda,
        SurvivalStrategy::SteadyState,
    ];

    #[test]
    fn mu_plus_lambda_keeps_lowest_overall() {
        let mut rng = StdRng::seed_from_u64(0);
        let population = individuals(&[5.0, 1.0, 9.0, 3.0], 0);
        let offspring = individuals(&[2.0, 8.0, 0.5, 7.0], 1);

        let survivors =
            survival_selection(population, offspring, SurvivalStrategy::MuPlusLambda, true, 4, &mut rng).unwrap();
        let values: Vec<f64> = survivors.iter().map(|i| i.fitness.value).collect();
        assert_eq!(values, vec![0.5, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn steady_state_takes_best_half_of_each() {
        let mut rng = StdRng::seed_from_u64(0);
        let population = individuals(&[5.0, 1.0, 9.0, 3.0], 0);
        let offspring = individuals(&[2.0, 8.0, 0.5, 7.0], 1);

        let survivors =
            survival_selection(population, offspring, SurvivalStrategy::SteadyState, true, 4, &mut rng).unwrap();
        let values: Vec<f64> = survivors.iter().map(|i| i.fitness.value).collect();
        assert_eq!(values, vec![1.0, 3.0, 0.5, 2.0]);
    }

    #[test]
    fn generational_elitism_reinserts_population_best() {
        let mut rng = StdRng::seed_from_u64(0);
        let population = individuals(&[5.0, 0.1, 9.0, 3.0], 0);
        let offspring = individuals(&[2.0, 8.0, 4.0, 7.0], 1);

        let survivors =
            survival_selection(population, offspring, SurvivalStrategy::Generational, true, 4, &mut rng).unwrap();
        assert!(survivors.iter().any(|i| i.genotype == vec![0, 1]));
        assert_eq!(survivors.iter().filter(|i| i.genotype[0] == 1).count(), 3);
    }

    #[test]
    fn generational_without_elitism_is_pure_replacement() {
        let mut rng = StdRng::seed_from_u64(0);
        let population = individuals(&[0.1, 0.2], 0);
        let offspring = individuals(&[2.0, 8.0], 1);

        let survivors = survival_selection(
            population,
            offspring.clone(),
            SurvivalStrategy::Generational,
            false,
            2,
            &mut rng,
        )
        .unwrap();
        assert_eq!(survivors, offspring);
    }

    #[test]
    fn generational_with_wrong_offspring_count_is_an_invariant_violation() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = survival_selection(
            individuals(&[1.0, 2.0, 3.0, 4.0], 0),
            individuals(&[1.0, 2.0], 1),
            SurvivalStrategy::Generational,
            true,
            4,
            &mut rng,
        );
        assert!(matches!(result, Err(GeError::InvariantViolation(_))));
    }

    proptest! {
        #[test]
        fn every_strategy_preserves_population_length(
            fitnesses in prop::collection::vec(0.0f64..1000.0, 2..40),
            seed in any::<u64>(),
        ) {
            let length = fitnesses.len() - fitnesses.len() % 2;
            let population = individuals(&fitnesses[..length], 0);
            let offspring = individuals(&fitnesses[fitnesses.len() - length..], 1);
            let mut rng = StdRng::seed_from_u64(seed);

            for strategy in STRATEGIES {
                let survivors = survival_selection(
                    population.clone(),
                    offspring.clone(),
                    strategy,
                    true,
                    length,
                    &mut rng,
                )
                .unwrap();
                prop_assert_eq!(survivors.len(), length);
            }
        }
    }
}
