use std::path::Path;

use super::lowpass::LowPassFilter;
use super::params::AcquisitionParameters;
use super::reduce::CycleReducer;
use crate::data::discovery::CycleFileSet;
use crate::data::loader::load_capture;
use crate::data::model::{file_label, MetricSeries, RunContext};
use crate::error::Result;

/// Stage reports for a status display. Purely informational.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    Discovered { files: usize },
    Detected(&'a AcquisitionParameters),
    Reducing { index: usize, total: usize, path: &'a Path },
    Finished { cycles: usize },
}

impl std::fmt::Display for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Progress::Discovered { files } => write!(f, "Found {files} capture files"),
            Progress::Detected(p) => write!(
                f,
                "Motor frequency {} Hz, sampling interval {} us",
                p.motor_frequency_hz,
                (p.sampling_interval_s * 1e6).round()
            ),
            Progress::Reducing { index, total, path } => {
                write!(f, "Reducing {} ({}/{total})", file_label(path), index + 1)
            }
            Progress::Finished { cycles } => write!(f, "Done: {cycles} cycles"),
        }
    }
}

/// Run the whole pipeline for `ctx.input_dir`.
pub fn build_series(ctx: &RunContext) -> Result<MetricSeries> {
    build_series_with_progress(ctx, |_| {})
}

/// Run the whole pipeline, reporting each stage to `progress`.
///
/// Parameters and the filter are computed once from the middle cycle, then
/// every capture is loaded, reduced and dropped in cycle-index order. The
/// first failure aborts the run; no partial series is returned.
pub fn build_series_with_progress(
    ctx: &RunContext,
    mut progress: impl FnMut(Progress<'_>),
) -> Result<MetricSeries> {
    let files = CycleFileSet::discover(&ctx.input_dir)?;
    progress(Progress::Discovered { files: files.len() });

    let rep_pos = files.representative_position();
    let representative = load_capture(&files.representative().path, &ctx.channels)?;
    let params = AcquisitionParameters::detect(&representative, ctx.motor_frequency_override)?;
    progress(Progress::Detected(&params));

    let filter = LowPassFilter::design(&params)?;
    let reducer = CycleReducer::new(&filter, ctx);

    let total = files.len();
    let mut representative = Some(representative);
    let mut expected_len = None;
    let mut metrics = Vec::with_capacity(total);

    for (index, file) in files.iter().enumerate() {
        progress(Progress::Reducing {
            index,
            total,
            path: &file.path,
        });
        let reused = if index == rep_pos {
            representative.take()
        } else {
            None
        };
        let capture = match reused {
            Some(capture) => capture,
            None => load_capture(&file.path, &ctx.channels)?,
        };

        // The first cycle's length is authoritative for the run.
        let expected = *expected_len.get_or_insert(capture.len());
        if capture.len() != expected {
            log::warn!(
                "{} has {} samples, first cycle has {expected}",
                file_label(&file.path),
                capture.len()
            );
        }

        let metric = reducer.reduce(&capture);
        log::debug!(
            "cycle {} ({}): CoF {:.4}, amplitude {:.3}, humidity {:.1}",
            file.index,
            file_label(&file.path),
            metric.friction_coefficient,
            metric.amplitude,
            metric.humidity
        );
        metrics.push(metric);
    }

    let series = MetricSeries::from_metrics(&metrics, params);
    progress(Progress::Finished {
        cycles: series.len(),
    });
    log::info!(
        "Reduced {} cycles ({} policy) from {}",
        series.len(),
        ctx.policy,
        ctx.input_dir.display()
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::reduce::ExtremaPolicy;
    use crate::data::loader::write_capture;
    use crate::data::model::{Capture, ChannelMap, DEFAULT_LOAD};
    use crate::error::AnalysisError;
    use crate::prefs::Preferences;
    use std::f64::consts::PI;
    use std::path::PathBuf;

    fn write_cycle(dir: &Path, index: usize, force_pp: f64, n: usize) {
        let capture = Capture {
            path: PathBuf::new(),
            timestamps_us: (0..n).map(|i| i as f64 * 1000.0).collect(),
            force: (0..n)
                .map(|i| force_pp / 2.0 * (2.0 * PI * 5.0 * i as f64 / 1000.0).sin())
                .collect(),
            displacement: (0..n)
                .map(|i| 0.5 * (2.0 * PI * 5.0 * i as f64 / 1000.0).cos())
                .collect(),
            motor: Some(vec![2.0; n]),
            humidity: vec![5.5; n],
        };
        let path = dir.join(format!("auto${index}.csv"));
        write_capture(&path, &ChannelMap::default(), &capture).unwrap();
    }

    fn ctx(dir: &Path) -> RunContext {
        RunContext::new(dir, &Preferences::default(), DEFAULT_LOAD)
            .with_policy(ExtremaPolicy::Simple)
    }

    #[test]
    fn test_series_follows_cycle_order() {
        let dir = tempfile::tempdir().unwrap();
        // Written out of order; force grows with the cycle index.
        for &i in &[3usize, 0, 11, 2, 1] {
            write_cycle(dir.path(), i, 1.0 + i as f64, 400);
        }

        let mut stages = Vec::new();
        let series = build_series_with_progress(&ctx(dir.path()), |p| stages.push(p.to_string()))
            .unwrap();

        assert_eq!(series.len(), 5);
        assert_eq!(series.cycle_counts, vec![0, 10, 20, 30, 40]);
        assert_eq!(series.params.motor_frequency_hz, 20.0);
        let cof = &series.friction_coefficient;
        assert!(cof.windows(2).all(|w| w[0] < w[1]), "{cof:?}");
        assert!(series.humidity.iter().all(|&h| (h - 55.0).abs() < 1e-9));

        assert_eq!(stages.first().map(String::as_str), Some("Found 5 capture files"));
        assert_eq!(stages.last().map(String::as_str), Some("Done: 5 cycles"));
        assert_eq!(stages.len(), 1 + 1 + 5 + 1);
    }

    #[test]
    fn test_one_bad_capture_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..4 {
            write_cycle(dir.path(), i, 1.0, 200);
        }
        std::fs::write(dir.path().join("auto$4.csv"), "garbage\n").unwrap();

        match build_series(&ctx(dir.path())) {
            Err(AnalysisError::MalformedCapture { path, .. }) => {
                assert_eq!(path, dir.path().join("auto$4.csv"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_name_processes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_cycle(dir.path(), 0, 1.0, 200);
        std::fs::write(dir.path().join("test_7.csv"), "").unwrap();

        let mut reduced = 0;
        let result = build_series_with_progress(&ctx(dir.path()), |p| {
            if matches!(p, Progress::Reducing { .. }) {
                reduced += 1;
            }
        });
        assert!(matches!(result, Err(AnalysisError::MalformedFilename { .. })));
        assert_eq!(reduced, 0);
    }

    #[test]
    fn test_cutoff_above_nyquist_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_cycle(dir.path(), 0, 1.0, 200);
        // 1 kHz sampling → 500 Hz nyquist.
        let ctx = ctx(dir.path()).with_motor_frequency(600.0);
        assert!(matches!(
            build_series(&ctx),
            Err(AnalysisError::InvalidFilterDesign { .. })
        ));
    }
}
