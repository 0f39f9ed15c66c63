use crate::config::GeConfig;
use crate::engines::evaluation::fitness::{Evaluation, FitnessEvaluator, PenaltyWeights};
use crate::engines::generation::{
    decoder::GrammarDecoder,
    genome::Genotype,
    grammar::Grammar,
    local_search::local_search,
    operators::*,
    progress::StatisticsSink,
    restrictions::RestrictionController,
    survival::{best_index, survival_selection},
};
use crate::engines::metrics::generation_stats;
use crate::error::GeError;
use crate::types::Individual;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one execution of the evolutionary loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub best_fitness: f64,
    pub best_genotype: Genotype,
    pub best_phenotype: Option<String>,
    pub evaluations: usize,
    pub generations_run: usize,
    pub final_weights: PenaltyWeights,
    pub final_mutation_probability: f64,
    pub final_tournament_size: usize,
}

pub struct EvolutionEngine {
    config: GeConfig,
    evaluator: FitnessEvaluator,
    controller: RestrictionController,
    weights: PenaltyWeights,
    rng: StdRng,
    evaluations: usize,
    /// Wrap counts logged since the last statistics record.
    wraps: Vec<usize>,
}

impl EvolutionEngine {
    pub fn new(config: GeConfig, seed: Option<u64>) -> Result<Self, GeError> {
        config.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let grammar = Arc::new(Grammar::standard()?);
        let decoder = GrammarDecoder::new(grammar, config.fitness.max_wraps);
        let evaluator = FitnessEvaluator::new(
            decoder,
            config.fitness.clone(),
            config.evolution.max_genotype_len,
        )?;
        let controller = RestrictionController::new(config.restrictions.clone());
        let weights = controller.initial_weights();

        Ok(Self {
            config,
            evaluator,
            controller,
            weights,
            rng,
            evaluations: 0,
            wraps: Vec::new(),
        })
    }

    /// Run the evolution process until the success threshold or the
    /// generation budget is reached.
    pub fn run<S: StatisticsSink>(&mut self, mut sink: S) -> Result<ExecutionResult, GeError> {
        let evolution = self.config.evolution.clone();
        let population_length = evolution.population_length;
        let invalid_fitness = self.config.fitness.invalid_fitness;

        log::info!(
            "Starting execution: problem {}, population {}, max generations {}",
            self.evaluator.problem().id(),
            population_length,
            evolution.max_gens
        );

        let mut population = self.initialize_population();
        self.check_population(&population)?;

        let mut generation = 0;
        let mut mutation_prob = mutation_probability(0, evolution.pm_0, evolution.pm_inf);
        let mut tournament = tournament_size(
            0,
            evolution.initial_tournament_size,
            evolution.final_tournament_size,
        );

        sink.record(&generation_stats(0, &population, &self.wraps, invalid_fitness));
        self.wraps.clear();
        let mut success = self.best(&population).fitness.value <= evolution.success_threshold;

        while !success && generation < evolution.max_gens {
            generation += 1;
            mutation_prob = mutation_probability(generation, evolution.pm_0, evolution.pm_inf);
            tournament = tournament_size(
                generation,
                evolution.initial_tournament_size,
                evolution.final_tournament_size,
            );

            // Selection
            let parents = tournament_selection(&population, population_length, tournament, &mut self.rng);

            // Mating
            let mut offspring = mate(&parents, evolution.mating_probability, &mut self.rng);

            // Mutation
            for child in offspring.iter_mut() {
                mutate(child, mutation_prob, &mut self.rng);
            }

            // Duplication
            let offspring: Vec<Genotype> = offspring
                .iter()
                .map(|child| {
                    duplicate(
                        child,
                        evolution.duplication_probability,
                        evolution.min_duplication_len,
                        evolution.max_duplication_len,
                        &mut self.rng,
                    )
                })
                .collect();

            // Evaluation
            let mut offspring = self.evaluate_all(offspring);

            // Local search
            if generation % self.config.local_search.interval == 0 {
                offspring = self.refine(offspring);
            }

            // Survival selection
            population = survival_selection(
                population,
                offspring,
                evolution.survival_selection,
                evolution.elitism,
                population_length,
                &mut self.rng,
            )?;
            self.check_population(&population)?;

            // Restrictions
            let best = self.best(&population);
            self.controller.observe(
                best.len() <= evolution.max_genotype_len,
                best.fitness.feasible,
            );

            if self.controller.is_due(generation) && self.controller.adapt(&mut self.weights) {
                population = self.reevaluate(population);
            }

            let stats = generation_stats(generation, &population, &self.wraps, invalid_fitness);
            self.wraps.clear();
            log::debug!(
                "generation {}: min {:.6} avg {:.6} std {:.6}",
                generation,
                stats.min_fitness,
                stats.mean_fitness,
                stats.std_fitness
            );
            sink.record(&stats);

            if stats.min_fitness <= evolution.success_threshold {
                success = true;
            }
        }

        let best = self.best(&population).clone();
        let best_phenotype = self
            .evaluator
            .decoder()
            .decode(&best.genotype)
            .ok()
            .map(|decoded| decoded.expression);

        log::info!(
            "Execution finished after {} generations (success: {}). Best individual: {}, fitness value: {}",
            generation,
            success,
            best_phenotype.as_deref().unwrap_or("<undecodable>"),
            best.fitness.value
        );

        Ok(ExecutionResult {
            success,
            best_fitness: best.fitness.value,
            best_genotype: best.genotype,
            best_phenotype,
            evaluations: self.evaluations,
            generations_run: generation,
            final_weights: self.weights,
            final_mutation_probability: mutation_prob,
            final_tournament_size: tournament,
        })
    }

    fn initialize_population(&mut self) -> Vec<Individual> {
        let evolution = &self.config.evolution;
        let genotypes: Vec<Genotype> = (0..evolution.population_length)
            .map(|_| {
                random_genotype(
                    evolution.min_initial_len,
                    evolution.max_initial_len,
                    &mut self.rng,
                )
            })
            .collect();

        self.evaluate_all(genotypes)
    }

    /// Score a batch against the current weight snapshot, charging the
    /// budget and logging wraps.
    fn evaluate_all(&mut self, genotypes: Vec<Genotype>) -> Vec<Individual> {
        let weights = self.weights;
        let evaluations: Vec<Evaluation> = self.evaluator.score_batch(&genotypes, &weights);

        self.evaluations += evaluations.len();
        self.wraps.extend(evaluations.iter().map(|e| e.wraps));

        genotypes
            .into_iter()
            .zip(evaluations)
            .map(|(genotype, evaluation)| Individual::new(genotype, evaluation.fitness))
            .collect()
    }

    fn refine(&mut self, offspring: Vec<Individual>) -> Vec<Individual> {
        let weights = self.weights;
        offspring
            .iter()
            .map(|individual| {
                let outcome = local_search(
                    individual,
                    &self.evaluator,
                    &weights,
                    &self.config.local_search,
                    &mut self.rng,
                );
                self.evaluations += outcome.evaluations;
                self.wraps.extend(outcome.wraps);
                outcome.individual
            })
            .collect()
    }

    /// Fitness is stale after a weight change, so score everything again.
    fn reevaluate(&mut self, population: Vec<Individual>) -> Vec<Individual> {
        log::debug!(
            "Re-scoring {} individuals under penalty weights v{}",
            population.len(),
            self.weights.version
        );
        let genotypes = population.into_iter().map(|i| i.genotype).collect();
        self.evaluate_all(genotypes)
    }

    fn best<'p>(&self, population: &'p [Individual]) -> &'p Individual {
        let idx = best_index(population).unwrap_or(0);
        log::trace!("Best individual at index {}", idx);
        &population[idx]
    }

    fn check_population(&self, population: &[Individual]) -> Result<(), GeError> {
        if population.len() != self.config.evolution.population_length {
            return Err(GeError::InvariantViolation(format!(
                "Population holds {} individuals, expected {}",
                population.len(),
                self.config.evolution.population_length
            )));
        }
        Ok(())
    }
}

/// Run a single execution, streaming per-generation statistics to `sink`.
pub fn run_one_execution<S: StatisticsSink>(
    config: &GeConfig,
    seed: Option<u64>,
    sink: S,
) -> Result<ExecutionResult, GeError> {
    EvolutionEngine::new(config.clone(), seed)?.run(sink)
}
