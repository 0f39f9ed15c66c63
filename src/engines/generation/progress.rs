use crate::types::GenerationStats;

/// Receives one `GenerationStats` per generation, starting with the initial
/// population as generation 0.
pub trait StatisticsSink {
    fn record(&mut self, stats: &GenerationStats);
}

impl<S: StatisticsSink + ?Sized> StatisticsSink for &mut S {
    fn record(&mut self, stats: &GenerationStats) {
        (**self).record(stats);
    }
}

/// Keeps every generation in memory.
#[derive(Debug, Default, Clone)]
pub struct StatisticsCollector {
    generations: Vec<GenerationStats>,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generations(&self) -> &[GenerationStats] {
        &self.generations
    }
}

impl StatisticsSink for StatisticsCollector {
    fn record(&mut self, stats: &GenerationStats) {
        self.generations.push(*stats);
    }
}

/// Logs a progress line every `every` generations.
pub struct ConsoleProgressCallback {
    every: usize,
}

impl ConsoleProgressCallback {
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1) }
    }
}

impl StatisticsSink for ConsoleProgressCallback {
    fn record(&mut self, stats: &GenerationStats) {
        if stats.generation % self.every == 0 {
            log::info!(
                "generation {}\tmin {:.6}\tavg {:.6}\tstd {:.6}",
                stats.generation,
                stats.min_fitness,
                stats.mean_fitness,
                stats.std_fitness
            );
        }
    }
}

/// Fans one record out to two sinks.
pub struct TeeSink<A, B>(pub A, pub B);

impl<A: StatisticsSink, B: StatisticsSink> StatisticsSink for TeeSink<A, B> {
    fn record(&mut self, stats: &GenerationStats) {
        self.0.record(stats);
        self.1.record(stats);
    }
}
