use anyhow::{Context, Result};
use antideriv_ge::config::ConfigManager;
use antideriv_ge::engines::experiment::{write_json_summary, CsvReport, ExperimentRunner};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // antideriv-ge [config.toml] [output.csv]
    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).map(|s| s.as_str());
    let output_override = args.get(2).cloned();

    let manager = ConfigManager::new();
    match config_path {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => log::info!("No configuration file given, using defaults"),
    }
    let config = manager.get();
    config.validate().context("Invalid configuration")?;

    let output = output_override.unwrap_or_else(|| config.experiment.log_file.clone());
    let summary_file = config.experiment.summary_file.clone();

    log::info!(
        "Problem {}: {} executions, population {}, {} generations, survival {:?}",
        config.fitness.problem,
        config.experiment.executions,
        config.evolution.population_length,
        config.evolution.max_gens,
        config.evolution.survival_selection
    );

    let runner = ExperimentRunner::new(config).context("Failed to set up experiment")?;
    let report = runner.run().context("Experiment aborted")?;

    CsvReport::write(&report, Path::new(&output))
        .with_context(|| format!("Failed to write CSV report to {}", output))?;

    if let Some(path) = summary_file {
        write_json_summary(&report, &path)
            .with_context(|| format!("Failed to write JSON summary to {}", path))?;
    }

    for (i, execution) in report.executions.iter().enumerate() {
        log::info!(
            "#{:<3} success={:<5} fitness={:<12.6} evaluations={:<8} {}",
            i + 1,
            execution.success,
            execution.best_fitness,
            execution.evaluations,
            execution.best_phenotype.as_deref().unwrap_or("<undecodable>")
        );
    }

    println!("TE:   {:.2}%", report.summary.te);
    println!("VAMM: {:.6}", report.summary.vamm);
    println!("PEX:  {:.2}", report.summary.pex);

    Ok(())
}
