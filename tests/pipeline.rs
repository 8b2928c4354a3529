//! End-to-end runs over synthetic capture folders.
//!
//! Each test writes a run in the logger's on-disk layout into a temporary
//! directory and drives discovery → detection → filtering → reduction →
//! report through the public API.

use std::f64::consts::PI;
use std::path::Path;

use tribo_cycles::data::loader::write_capture;
use tribo_cycles::data::model::{Capture, ChannelMap, DEFAULT_LOAD};
use tribo_cycles::prefs::Preferences;
use tribo_cycles::report::{self, REPORT_FILE};
use tribo_cycles::{build_series, AnalysisError, ExtremaPolicy, RunContext};

const INTERVAL_US: f64 = 250.0;
const MOTOR_HZ: f64 = 20.0;

/// Force at 2 Hz with peak-to-peak `force_pp`, well inside the 20 Hz passband.
fn capture(force_pp: f64, n: usize) -> Capture {
    let dt = INTERVAL_US * 1e-6;
    Capture {
        timestamps_us: (0..n).map(|i| i as f64 * INTERVAL_US).collect(),
        force: (0..n)
            .map(|i| force_pp / 2.0 * (2.0 * PI * 2.0 * i as f64 * dt).sin())
            .collect(),
        displacement: (0..n)
            .map(|i| 0.4 * (2.0 * PI * 2.0 * i as f64 * dt).sin())
            .collect(),
        motor: Some(vec![MOTOR_HZ / 10.0; n]),
        humidity: vec![4.8; n],
        ..Default::default()
    }
}

fn write_run(dir: &Path, force_pp: &[f64]) {
    for (i, &pp) in force_pp.iter().enumerate() {
        let path = dir.join(format!("auto${i}.csv"));
        write_capture(&path, &ChannelMap::default(), &capture(pp, 2000)).unwrap();
    }
}

#[test]
fn test_full_run_with_simple_extremes() {
    let dir = tempfile::tempdir().unwrap();
    let force_pp = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5];
    write_run(dir.path(), &force_pp);

    let ctx = RunContext::new(dir.path(), &Preferences::default(), DEFAULT_LOAD)
        .with_policy(ExtremaPolicy::Simple);
    let series = build_series(&ctx).unwrap();

    assert_eq!(series.len(), force_pp.len());
    for (i, &x) in series.cycle_counts.iter().enumerate() {
        assert_eq!(x, i as u64 * 10);
    }
    assert_eq!(series.params.motor_frequency_hz, MOTOR_HZ);
    assert!((series.params.sampling_interval_s - 250e-6).abs() < 1e-15);

    for (i, &pp) in force_pp.iter().enumerate() {
        let expected = pp / 9.8;
        let got = series.friction_coefficient[i];
        assert!((got - expected).abs() < expected * 1e-2, "cycle {i}: {got} vs {expected}");
        assert!((series.amplitude[i] - 0.8).abs() < 0.8 * 1e-2);
        assert!((series.humidity[i] - 48.0).abs() < 1e-9);
    }
}

#[test]
fn test_trimmed_and_simple_agree_on_clean_signal() {
    let dir = tempfile::tempdir().unwrap();
    write_run(dir.path(), &[2.0, 2.0, 2.0]);

    let base = RunContext::new(dir.path(), &Preferences::default(), DEFAULT_LOAD);
    let simple = build_series(&base.clone().with_policy(ExtremaPolicy::Simple)).unwrap();
    let trimmed = build_series(&base.with_policy(ExtremaPolicy::TrimmedMean)).unwrap();

    // 2000 samples at 4 kHz hold one 2 Hz period: the trimmed extremes sit
    // on the crest plateau, and the friction coefficient is halved.
    for i in 0..3 {
        let ratio = trimmed.friction_coefficient[i] / simple.friction_coefficient[i];
        assert!((ratio - 0.5).abs() < 1e-2, "ratio {ratio}");
        let amp_ratio = trimmed.amplitude[i] / simple.amplitude[i];
        assert!((amp_ratio - 1.0).abs() < 1e-2, "amplitude ratio {amp_ratio}");
    }
}

#[test]
fn test_report_matches_series() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_run(input.path(), &[1.0, 2.0, 3.0]);

    let ctx = RunContext::new(input.path(), &Preferences::default(), 19.6)
        .with_output_dir(output.path());
    let series = build_series(&ctx).unwrap();
    let path = report::write_csv(&series, output.path()).unwrap();
    assert_eq!(path, output.path().join(REPORT_FILE));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row[0].parse::<u64>().unwrap(), i as u64 * 10);
        let cof: f64 = row[1].parse().unwrap();
        assert_eq!(cof, series.friction_coefficient[i]);
    }
}

#[test]
fn test_short_capture_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(&dir.path().join("auto$0.csv"), &ChannelMap::default(), &capture(1.0, 3))
        .unwrap();

    let ctx = RunContext::new(dir.path(), &Preferences::default(), DEFAULT_LOAD);
    assert!(matches!(
        build_series(&ctx),
        Err(AnalysisError::MalformedCapture { .. }) | Err(AnalysisError::DegenerateSamplingRate { .. })
    ));
}

#[test]
fn test_malformed_filename_aborts_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    write_run(dir.path(), &[1.0, 1.0]);
    write_capture(&dir.path().join("test_7.csv"), &ChannelMap::default(), &capture(1.0, 10))
        .unwrap();

    let ctx = RunContext::new(dir.path(), &Preferences::default(), DEFAULT_LOAD);
    match build_series(&ctx) {
        Err(AnalysisError::MalformedFilename { path }) => {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("test_7.csv"))
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_export_without_motor_column_needs_frequency() {
    let dir = tempfile::tempdir().unwrap();
    let channels = ChannelMap {
        motor: None,
        ..ChannelMap::default()
    };
    for i in 0..3 {
        let mut cap = capture(2.0, 2000);
        cap.motor = None;
        write_capture(&dir.path().join(format!("auto${i}.csv")), &channels, &cap).unwrap();
    }

    let ctx = RunContext::new(dir.path(), &Preferences::default(), DEFAULT_LOAD)
        .with_channels(channels);
    assert!(matches!(
        build_series(&ctx),
        Err(AnalysisError::MalformedCapture { .. })
    ));

    let series = build_series(&ctx.with_motor_frequency(MOTOR_HZ)).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.params.motor_frequency_hz, MOTOR_HZ);
}
