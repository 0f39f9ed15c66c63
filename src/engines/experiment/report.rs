use super::runner::ExperimentReport;
use crate::error::GeError;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub const CSV_COLUMNS: [&str; 9] = [
    "generation",
    "avg_fitness",
    "min_fitness",
    "std_fitness",
    "avg_genotype_len",
    "min_genotype_len",
    "max_genotype_len",
    "avg_wrapping",
    "std_wrapping",
];

/// Per-generation averaged curves followed by `#TE: `, `#VAMM: ` and
/// `#PEX: ` summary lines.
pub struct CsvReport;

impl CsvReport {
    /// Write the report into `out` and hand the writer back.
    pub fn write_to<W: Write>(report: &ExperimentReport, out: W) -> Result<W, GeError> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        wtr.write_record(CSV_COLUMNS)?;
        for point in &report.curves {
            wtr.serialize(point)?;
        }
        wtr.flush()?;

        let mut out = wtr.into_inner().map_err(|err| GeError::Io(err.into_error()))?;
        writeln!(out, "#TE: {}", report.summary.te)?;
        writeln!(out, "#VAMM: {}", report.summary.vamm)?;
        writeln!(out, "#PEX: {}", report.summary.pex)?;
        out.flush()?;
        Ok(out)
    }

    pub fn render(report: &ExperimentReport) -> Result<String, GeError> {
        let bytes = Self::write_to(report, Vec::new())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write<P: AsRef<Path>>(report: &ExperimentReport, path: P) -> Result<(), GeError> {
        let path = path.as_ref();
        Self::write_to(report, File::create(path)?)?;
        log::info!("CSV report written to {}", path.display());
        Ok(())
    }
}

/// Whole report, executions included, as pretty JSON.
pub fn write_json_summary<P: AsRef<Path>>(report: &ExperimentReport, path: P) -> Result<(), GeError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path.as_ref(), json)?;
    log::info!("JSON summary written to {}", path.as_ref().display());
    Ok(())
}
