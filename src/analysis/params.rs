use crate::data::model::Capture;
use crate::error::{AnalysisError, Result};

/// Hz per volt of the motor-speed channel.
pub const MOTOR_CALIBRATION: f64 = 10.0;

/// Samples needed to read the interval off indices 2 and 3.
pub const MIN_DETECTION_SAMPLES: usize = 4;

/// Run-wide acquisition settings detected from a representative cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionParameters {
    /// Drive frequency, rounded to whole Hz.
    pub motor_frequency_hz: f64,
    /// Sampling interval in seconds (whole microseconds).
    pub sampling_interval_s: f64,
}

impl AcquisitionParameters {
    /// Detect parameters from `capture`.
    ///
    /// The interval is read from the pair at indices 2 and 3, past any
    /// start-up artefact at index 0. A uniform sampling grid is assumed and
    /// not checked.
    pub fn detect(capture: &Capture, motor_override: Option<f64>) -> Result<Self> {
        if capture.len() < MIN_DETECTION_SAMPLES {
            return Err(AnalysisError::malformed(
                &capture.path,
                format!(
                    "{} samples, parameter detection needs at least {MIN_DETECTION_SAMPLES}",
                    capture.len()
                ),
            ));
        }

        let interval_us = (capture.timestamps_us[3] - capture.timestamps_us[2]).round();
        if interval_us <= 0.0 {
            return Err(AnalysisError::DegenerateSamplingRate {
                path: capture.path.clone(),
                interval_us,
            });
        }

        let motor_frequency_hz = match motor_override {
            Some(hz) => hz,
            None => {
                let motor = capture.motor.as_deref().ok_or_else(|| {
                    AnalysisError::malformed(
                        &capture.path,
                        "no motor-speed column and no motor frequency given",
                    )
                })?;
                (mean(motor) * MOTOR_CALIBRATION).round()
            }
        };

        let params = Self {
            motor_frequency_hz,
            sampling_interval_s: interval_us * 1e-6,
        };
        log::info!(
            "Detected motor frequency {} Hz, sampling interval {} us",
            params.motor_frequency_hz,
            interval_us
        );
        Ok(params)
    }

    pub fn sample_rate_hz(&self) -> f64 {
        1.0 / self.sampling_interval_s
    }

    /// `1 / (2·t[1])` with `t[k] = k·interval`, i.e. half the sample rate.
    pub fn nyquist_hz(&self) -> f64 {
        1.0 / (2.0 * self.sampling_interval_s)
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn capture(timestamps: &[f64], motor: f64) -> Capture {
        let n = timestamps.len();
        Capture {
            path: PathBuf::from("auto$5.csv"),
            timestamps_us: timestamps.to_vec(),
            force: vec![0.0; n],
            displacement: vec![0.0; n],
            motor: Some(vec![motor; n]),
            humidity: vec![0.0; n],
        }
    }

    #[test]
    fn test_detects_frequency_and_interval() {
        let cap = capture(&[0.0, 250.0, 500.0, 750.0, 1000.0], 2.04);
        let p = AcquisitionParameters::detect(&cap, None).unwrap();
        assert_eq!(p.motor_frequency_hz, 20.0);
        assert!((p.sampling_interval_s - 250e-6).abs() < 1e-15);
        assert!((p.sample_rate_hz() - 4000.0).abs() < 1e-9);
        assert!((p.nyquist_hz() - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_interval_uses_third_and_fourth_sample() {
        // Irregular first step must not leak into the interval.
        let cap = capture(&[0.0, 7.0, 100.0, 200.4, 300.0], 1.0);
        let p = AcquisitionParameters::detect(&cap, None).unwrap();
        assert!((p.sampling_interval_s - 100e-6).abs() < 1e-15);
    }

    #[test]
    fn test_too_few_samples() {
        let cap = capture(&[0.0, 1.0, 2.0], 1.0);
        assert!(matches!(
            AcquisitionParameters::detect(&cap, None),
            Err(AnalysisError::MalformedCapture { .. })
        ));
    }

    #[test]
    fn test_zero_interval_is_degenerate() {
        let cap = capture(&[0.0, 1.0, 5.0, 5.0], 1.0);
        match AcquisitionParameters::detect(&cap, None) {
            Err(AnalysisError::DegenerateSamplingRate { path, interval_us }) => {
                assert_eq!(path, PathBuf::from("auto$5.csv"));
                assert_eq!(interval_us, 0.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_override_replaces_motor_channel() {
        let mut cap = capture(&[0.0, 1.0, 2.0, 3.0], 1.0);
        cap.motor = None;
        assert!(AcquisitionParameters::detect(&cap, None).is_err());
        let p = AcquisitionParameters::detect(&cap, Some(15.0)).unwrap();
        assert_eq!(p.motor_frequency_hz, 15.0);
    }
}
