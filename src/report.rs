use std::path::{Path, PathBuf};

use crate::data::model::MetricSeries;
use crate::error::{AnalysisError, Result};

/// Report file written into the output directory.
pub const REPORT_FILE: &str = "result.csv";

/// Column order: cycle count, friction coefficient, amplitude, humidity.
pub const REPORT_HEADERS: [&str; 4] = ["繰り返し数", "せん断力係数", "相対振幅", "相対湿度"];

/// Write `series` as `result.csv` in `dir` and return the file path.
///
/// Rows go to a hidden temporary file first and are renamed into place only
/// once complete, so a failure never leaves a partial report behind.
pub fn write_csv(series: &MetricSeries, dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(AnalysisError::InvalidInputPath {
            path: dir.to_path_buf(),
            reason: "output directory does not exist".to_string(),
        });
    }

    let target = dir.join(REPORT_FILE);
    let partial = dir.join(format!(".{REPORT_FILE}.partial"));

    if let Err(e) = write_rows(series, &partial) {
        let _ = std::fs::remove_file(&partial);
        return Err(AnalysisError::io(&partial, e.into()));
    }
    std::fs::rename(&partial, &target).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        AnalysisError::io(&target, e)
    })?;

    log::info!("Wrote {} rows to {}", series.len(), target.display());
    Ok(target)
}

fn write_rows(series: &MetricSeries, path: &Path) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(REPORT_HEADERS)?;
    for (cycles, metric) in series.iter() {
        writer.write_record([
            cycles.to_string(),
            metric.friction_coefficient.to_string(),
            metric.amplitude.to_string(),
            metric.humidity.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
