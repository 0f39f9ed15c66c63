use crate::config::GeConfig;
use crate::engines::generation::evolution_engine::{run_one_execution, ExecutionResult};
use crate::engines::generation::progress::{ConsoleProgressCallback, StatisticsCollector, TeeSink};
use crate::error::GeError;
use crate::types::GenerationStats;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One generation's statistics averaged over every execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AveragedGeneration {
    pub generation: usize,
    pub avg_fitness: f64,
    pub min_fitness: f64,
    pub std_fitness: f64,
    pub avg_genotype_len: f64,
    pub min_genotype_len: f64,
    pub max_genotype_len: f64,
    pub avg_wrapping: f64,
    pub std_wrapping: f64,
}

impl AveragedGeneration {
    fn accumulate(&mut self, stats: &GenerationStats) {
        self.avg_fitness += stats.mean_fitness;
        self.min_fitness += stats.min_fitness;
        self.std_fitness += stats.std_fitness;
        self.avg_genotype_len += stats.mean_len;
        self.min_genotype_len += stats.min_len as f64;
        self.max_genotype_len += stats.max_len as f64;
        self.avg_wrapping += stats.mean_wrap;
        self.std_wrapping += stats.std_wrap;
    }

    fn scale(&mut self, factor: f64) {
        self.avg_fitness *= factor;
        self.min_fitness *= factor;
        self.std_fitness *= factor;
        self.avg_genotype_len *= factor;
        self.min_genotype_len *= factor;
        self.max_genotype_len *= factor;
        self.avg_wrapping *= factor;
        self.std_wrapping *= factor;
    }
}

/// Success rate (TE, percent), mean best fitness at termination (VAMM) and
/// mean evaluations among successful executions (PEX, -1 when none succeed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub executions: usize,
    pub successes: usize,
    pub te: f64,
    pub vamm: f64,
    pub pex: f64,
}

impl ExperimentSummary {
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let executions = results.len();
        let successful: Vec<&ExecutionResult> = results.iter().filter(|r| r.success).collect();
        let successes = successful.len();

        let te = if executions == 0 {
            0.0
        } else {
            100.0 * successes as f64 / executions as f64
        };
        let vamm = if executions == 0 {
            0.0
        } else {
            results.iter().map(|r| r.best_fitness).sum::<f64>() / executions as f64
        };
        let pex = if successes == 0 {
            -1.0
        } else {
            successful.iter().map(|r| r.evaluations as f64).sum::<f64>() / successes as f64
        };

        Self {
            executions,
            successes,
            te,
            vamm,
            pex,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub problem: u8,
    pub curves: Vec<AveragedGeneration>,
    pub executions: Vec<ExecutionResult>,
    pub summary: ExperimentSummary,
}

/// Runs independent executions and aggregates their curves.
pub struct ExperimentRunner {
    config: GeConfig,
}

/// Generations between console progress lines.
const PROGRESS_EVERY: usize = 100;

impl ExperimentRunner {
    pub fn new(config: GeConfig) -> Result<Self, GeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Per-execution seeds drawn from a master generator seeded with the
    /// configured base seed.
    pub fn execution_seeds(&self) -> Vec<u64> {
        let mut master = StdRng::seed_from_u64(self.config.experiment.seed);
        (0..self.config.experiment.executions)
            .map(|_| master.gen())
            .collect()
    }

    pub fn run(&self) -> Result<ExperimentReport, GeError> {
        let seeds = self.execution_seeds();
        let total = seeds.len();
        let mut curves = vec![AveragedGeneration::default(); self.config.evolution.max_gens + 1];
        let mut executions = Vec::with_capacity(total);

        for (i, seed) in seeds.into_iter().enumerate() {
            log::info!("Execution {}/{} (seed {})", i + 1, total, seed);

            let mut collector = StatisticsCollector::new();
            let console = ConsoleProgressCallback::new(PROGRESS_EVERY);
            let result = run_one_execution(&self.config, Some(seed), TeeSink(&mut collector, console))?;

            for stats in collector.generations() {
                if let Some(point) = curves.get_mut(stats.generation) {
                    point.accumulate(stats);
                }
            }

            log::info!(
                "Execution {}: success = {}, best fitness = {:.6}, phenotype = {}",
                i + 1,
                result.success,
                result.best_fitness,
                result.best_phenotype.as_deref().unwrap_or("<undecodable>")
            );
            executions.push(result);
        }

        // Generations an execution never reached contribute zero.
        let factor = if total == 0 { 0.0 } else { 1.0 / total as f64 };
        for (g, point) in curves.iter_mut().enumerate() {
            point.generation = g;
            point.scale(factor);
        }

        let summary = ExperimentSummary::from_results(&executions);
        log::info!(
            "TE = {:.2}%, VAMM = {:.6}, PEX = {:.2}",
            summary.te,
            summary.vamm,
            summary.pex
        );

        Ok(ExperimentReport {
            problem: self.config.fitness.problem,
            curves,
            executions,
            summary,
        })
    }
}
