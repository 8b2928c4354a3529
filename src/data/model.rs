use std::path::{Path, PathBuf};

use crate::analysis::params::AcquisitionParameters;
use crate::analysis::reduce::ExtremaPolicy;
use crate::error::{AnalysisError, Result};
use crate::prefs::Preferences;

/// Cycles elapsed between two consecutive capture files.
pub const CYCLES_PER_FILE: u64 = 10;

/// Normal load (N) used when the operator leaves the field empty.
pub const DEFAULT_LOAD: f64 = 9.8;

// ---------------------------------------------------------------------------
// ChannelMap – which logger column plays which role
// ---------------------------------------------------------------------------

/// Column names of the logger export. Channel roles are fixed for the rig,
/// only the labels are configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMap {
    pub timestamp: String,
    pub force: String,
    pub displacement: String,
    /// Motor-speed channel. `None` for exports without it, in which case
    /// the motor frequency must be given via
    /// [`RunContext::motor_frequency_override`].
    pub motor: Option<String>,
    pub humidity: String,
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            timestamp: "日時(μs)".to_string(),
            force: "(1)HA-V01".to_string(),
            displacement: "(1)HA-V02".to_string(),
            motor: Some("(1)HA-V04".to_string()),
            humidity: "(1)HA-V06".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Capture – one file = one cycle block
// ---------------------------------------------------------------------------

/// One cycle capture held fully in memory. All channels have the same length.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    pub path: PathBuf,
    /// Timestamps in microseconds, strictly increasing.
    pub timestamps_us: Vec<f64>,
    /// Force channel (V).
    pub force: Vec<f64>,
    /// Displacement channel (V).
    pub displacement: Vec<f64>,
    /// Motor-speed channel (V), absent when the export has no such column.
    pub motor: Option<Vec<f64>>,
    /// Humidity channel (V).
    pub humidity: Vec<f64>,
}

impl Capture {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.timestamps_us.len()
    }

    /// Whether the capture holds no samples.
    pub fn is_empty(&self) -> bool {
        self.timestamps_us.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RunContext – immutable run configuration
// ---------------------------------------------------------------------------

/// Everything a run needs from the outside, built once and passed by
/// reference to every stage.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub input_dir: PathBuf,
    /// Where the report goes. `None` keeps the series in memory only.
    pub output_dir: Option<PathBuf>,
    pub friction_scale: f64,
    pub amp_scale: f64,
    /// Normal load (N).
    pub load: f64,
    pub policy: ExtremaPolicy,
    pub channels: ChannelMap,
    /// Skip motor-channel detection and use this cutoff (Hz) instead.
    pub motor_frequency_override: Option<f64>,
}

impl RunContext {
    pub fn new(input_dir: impl Into<PathBuf>, prefs: &Preferences, load: f64) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            friction_scale: prefs.friction_scale,
            amp_scale: prefs.amp_scale,
            load,
            policy: ExtremaPolicy::default(),
            channels: ChannelMap::default(),
            motor_frequency_override: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_policy(mut self, policy: ExtremaPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_channels(mut self, channels: ChannelMap) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_motor_frequency(mut self, hz: f64) -> Self {
        self.motor_frequency_override = Some(hz);
        self
    }

    /// Parse the operator's load field. Empty text means [`DEFAULT_LOAD`].
    pub fn parse_load(text: &str) -> Result<f64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(DEFAULT_LOAD);
        }
        let load: f64 = trimmed.parse().map_err(|_| AnalysisError::InvalidParameter {
            name: "load",
            reason: format!("'{trimmed}' is not a number"),
        })?;
        if !load.is_finite() || load <= 0.0 {
            return Err(AnalysisError::InvalidParameter {
                name: "load",
                reason: format!("{load} must be a positive finite value"),
            });
        }
        Ok(load)
    }
}

// ---------------------------------------------------------------------------
// CycleMetric / MetricSeries – the reduced output
// ---------------------------------------------------------------------------

/// Scalar reduction of one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleMetric {
    /// Friction coefficient (dimensionless).
    pub friction_coefficient: f64,
    /// Relative displacement amplitude (µm).
    pub amplitude: f64,
    /// Relative humidity (%).
    pub humidity: f64,
}

/// Ordered metrics of a run on the synthetic cycle-count axis.
///
/// Index `i` of every sequence belongs to the `i`-th capture in cycle-index
/// order. Columns are exposed in the fixed order coefficient, amplitude,
/// humidity.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub cycle_counts: Vec<u64>,
    pub friction_coefficient: Vec<f64>,
    pub amplitude: Vec<f64>,
    pub humidity: Vec<f64>,
    /// Parameters every cycle of the run was processed with.
    pub params: AcquisitionParameters,
}

impl MetricSeries {
    pub fn from_metrics(metrics: &[CycleMetric], params: AcquisitionParameters) -> Self {
        Self {
            cycle_counts: (0..metrics.len() as u64).map(|i| i * CYCLES_PER_FILE).collect(),
            friction_coefficient: metrics.iter().map(|m| m.friction_coefficient).collect(),
            amplitude: metrics.iter().map(|m| m.amplitude).collect(),
            humidity: metrics.iter().map(|m| m.humidity).collect(),
            params,
        }
    }

    pub fn len(&self) -> usize {
        self.cycle_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycle_counts.is_empty()
    }

    pub fn metric(&self, i: usize) -> Option<CycleMetric> {
        Some(CycleMetric {
            friction_coefficient: *self.friction_coefficient.get(i)?,
            amplitude: *self.amplitude.get(i)?,
            humidity: *self.humidity.get(i)?,
        })
    }

    /// `(cycle count, metric)` pairs in run order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, CycleMetric)> + '_ {
        (0..self.len()).filter_map(move |i| Some((self.cycle_counts[i], self.metric(i)?)))
    }

    /// Highest cycle count on the axis (0 for an empty series).
    pub fn last_cycle(&self) -> u64 {
        self.cycle_counts.last().copied().unwrap_or(0)
    }
}

/// Display helper for status lines and logs.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AcquisitionParameters {
        AcquisitionParameters {
            motor_frequency_hz: 20.0,
            sampling_interval_s: 1e-3,
        }
    }

    #[test]
    fn test_empty_load_defaults() {
        assert_eq!(RunContext::parse_load("").unwrap(), DEFAULT_LOAD);
        assert_eq!(RunContext::parse_load("   ").unwrap(), DEFAULT_LOAD);
        assert_eq!(RunContext::parse_load(" 19.6 ").unwrap(), 19.6);
    }

    #[test]
    fn test_bad_load_rejected() {
        assert!(matches!(
            RunContext::parse_load("heavy"),
            Err(AnalysisError::InvalidParameter { name: "load", .. })
        ));
        assert!(RunContext::parse_load("0").is_err());
        assert!(RunContext::parse_load("-3").is_err());
        assert!(RunContext::parse_load("inf").is_err());
    }

    #[test]
    fn test_cycle_axis_steps_by_ten() {
        let metric = CycleMetric {
            friction_coefficient: 0.5,
            amplitude: 12.0,
            humidity: 40.0,
        };
        let series = MetricSeries::from_metrics(&[metric; 5], params());
        assert_eq!(series.len(), 5);
        assert_eq!(series.cycle_counts, vec![0, 10, 20, 30, 40]);
        assert_eq!(series.last_cycle(), 40);
        assert_eq!(series.metric(4), Some(metric));
        assert_eq!(series.metric(5), None);
        assert_eq!(series.iter().count(), 5);
    }

    #[test]
    fn test_context_takes_scales_from_preferences() {
        let prefs = Preferences {
            friction_scale: 2.5,
            amp_scale: 0.4,
        };
        let ctx = RunContext::new("/data/run", &prefs, DEFAULT_LOAD)
            .with_policy(ExtremaPolicy::Simple)
            .with_output_dir("/data/out");
        assert_eq!(ctx.friction_scale, 2.5);
        assert_eq!(ctx.amp_scale, 0.4);
        assert_eq!(ctx.policy, ExtremaPolicy::Simple);
        assert_eq!(ctx.output_dir.as_deref(), Some(Path::new("/data/out")));
        assert!(ctx.motor_frequency_override.is_none());
    }
}
