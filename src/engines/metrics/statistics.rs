use crate::types::{GenerationStats, Individual};

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0 with fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Summarise a population and the wrap counts logged while producing it.
///
/// Fitness figures only cover individuals below the invalid sentinel.
pub fn generation_stats(
    generation: usize,
    population: &[Individual],
    wraps: &[usize],
    invalid_fitness: f64,
) -> GenerationStats {
    let valid: Vec<f64> = population
        .iter()
        .map(|i| i.fitness.value)
        .filter(|&f| f < invalid_fitness)
        .collect();

    let (min_fitness, mean_fitness, std_fitness) = if valid.is_empty() {
        log::warn!("Generation {} has no valid individuals", generation);
        (invalid_fitness, invalid_fitness, 0.0)
    } else {
        let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
        (min, mean(&valid), sample_std(&valid))
    };

    let lengths: Vec<usize> = population.iter().map(Individual::len).collect();
    let min_len = lengths.iter().copied().min().unwrap_or(0);
    let max_len = lengths.iter().copied().max().unwrap_or(0);
    let mean_len = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    let wraps: Vec<f64> = wraps.iter().map(|&w| w as f64).collect();

    GenerationStats {
        generation,
        min_fitness,
        mean_fitness,
        std_fitness,
        min_len,
        max_len,
        mean_len,
        mean_wrap: mean(&wraps),
        std_wrap: sample_std(&wraps),
    }
}
