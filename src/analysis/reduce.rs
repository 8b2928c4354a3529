use std::fmt;

use serde::{Deserialize, Serialize};

use super::lowpass::LowPassFilter;
use super::params::mean;
use crate::data::model::{Capture, CycleMetric, RunContext};

/// Samples averaged on each side by [`ExtremaPolicy::TrimmedMean`].
pub const TRIM_COUNT: usize = 20;

/// Percent RH per volt of the humidity channel.
pub const HUMIDITY_CALIBRATION: f64 = 10.0;

// ---------------------------------------------------------------------------
// Extremal statistics
// ---------------------------------------------------------------------------

/// How a filtered waveform is reduced to a peak-to-peak span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremaPolicy {
    /// `max − min`.
    Simple,
    /// Mean of the [`TRIM_COUNT`] largest minus mean of the [`TRIM_COUNT`]
    /// smallest samples. Insensitive to single-sample spikes; the friction
    /// coefficient treats it as twice the half-amplitude.
    #[default]
    TrimmedMean,
}

impl ExtremaPolicy {
    pub const ALL: [ExtremaPolicy; 2] = [ExtremaPolicy::TrimmedMean, ExtremaPolicy::Simple];

    /// Peak-to-peak span of `values`; 0 for empty or flat input.
    pub fn span(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            ExtremaPolicy::Simple => {
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                max - min
            }
            ExtremaPolicy::TrimmedMean => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let k = TRIM_COUNT.min(sorted.len());
                mean(&sorted[sorted.len() - k..]) - mean(&sorted[..k])
            }
        }
    }

    /// Divisor applied to the force span before load normalisation.
    fn friction_divisor(self) -> f64 {
        match self {
            ExtremaPolicy::Simple => 1.0,
            ExtremaPolicy::TrimmedMean => 2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExtremaPolicy::Simple => "simple",
            ExtremaPolicy::TrimmedMean => "trimmed",
        }
    }
}

impl fmt::Display for ExtremaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// CycleReducer
// ---------------------------------------------------------------------------

/// Turns one capture into one [`CycleMetric`] using the run's shared filter
/// and scales. Pure: the same capture always yields the same metric.
pub struct CycleReducer<'a> {
    filter: &'a LowPassFilter,
    ctx: &'a RunContext,
}

impl<'a> CycleReducer<'a> {
    pub fn new(filter: &'a LowPassFilter, ctx: &'a RunContext) -> Self {
        Self { filter, ctx }
    }

    pub fn reduce(&self, capture: &Capture) -> CycleMetric {
        let policy = self.ctx.policy;

        let force = self.filter.filtfilt(&capture.force);
        let displacement = self.filter.filtfilt(&capture.displacement);

        let force_span = policy.span(&force);
        let disp_span = policy.span(&displacement);
        if force_span == 0.0 || disp_span == 0.0 {
            log::warn!(
                "Flat channel in {} (force span {force_span}, displacement span {disp_span})",
                capture.path.display()
            );
        }

        CycleMetric {
            friction_coefficient: force_span * self.ctx.friction_scale
                / (policy.friction_divisor() * self.ctx.load),
            amplitude: disp_span * self.ctx.amp_scale,
            humidity: mean(&capture.humidity) * HUMIDITY_CALIBRATION,
        }
    }
}
