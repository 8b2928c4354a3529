//! Linear-phase FIR low-pass design and zero-phase application.
//!
//! The kernel is a windowed sinc with a fixed length of [`NUM_TAPS`] and a
//! Hamming window. Its cutoff is the detected motor frequency, normalised
//! against the Nyquist rate derived from the sampling interval.
//!
//! Filtering runs the kernel forward, then backward over the reversed
//! output, which cancels the group delay so peak positions are preserved.

use std::f64::consts::PI;

use super::params::AcquisitionParameters;
use crate::error::{AnalysisError, Result};

/// Kernel length. Fixed trade-off between passband fidelity and delay cost.
pub const NUM_TAPS: usize = 101;

/// Odd-reflection padding at each end, in multiples of the kernel length.
const PAD_FACTOR: usize = 3;

/// FIR low-pass filter built once per run and shared by every cycle.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    coeffs: Vec<f64>,
    cutoff_hz: f64,
    nyquist_hz: f64,
}

impl LowPassFilter {
    /// Design the run filter: cutoff at the motor frequency.
    pub fn design(params: &AcquisitionParameters) -> Result<Self> {
        Self::with_cutoff(params.motor_frequency_hz, params.nyquist_hz())
    }

    /// Design a Hamming-windowed low-pass with `cutoff_hz < nyquist_hz`.
    pub fn with_cutoff(cutoff_hz: f64, nyquist_hz: f64) -> Result<Self> {
        if !cutoff_hz.is_finite()
            || !nyquist_hz.is_finite()
            || cutoff_hz <= 0.0
            || cutoff_hz >= nyquist_hz
        {
            return Err(AnalysisError::InvalidFilterDesign {
                cutoff_hz,
                nyquist_hz,
            });
        }

        let coeffs = design_hamming_lowpass(cutoff_hz / nyquist_hz, NUM_TAPS);
        log::info!(
            "Designed {NUM_TAPS}-tap Hamming low-pass, cutoff {cutoff_hz} Hz, nyquist {nyquist_hz} Hz"
        );
        Ok(Self {
            coeffs,
            cutoff_hz,
            nyquist_hz,
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn nyquist_hz(&self) -> f64 {
        self.nyquist_hz
    }

    /// Zero-phase filtering of `signal`.
    ///
    /// Both ends are extended by odd reflection (`3 × taps` samples, fewer
    /// for short signals) and each pass starts from the steady state of its
    /// first input sample, so edges do not ring toward zero. Signals of
    /// length 0 or 1 are returned unchanged.
    pub fn filtfilt(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n < 2 {
            return signal.to_vec();
        }
        let pad = (PAD_FACTOR * self.coeffs.len()).min(n - 1);

        let extended = odd_extend(signal, pad);
        let mut y = self.apply(&extended);
        y.reverse();
        let mut y = self.apply(&y);
        y.reverse();

        y.drain(..pad);
        y.truncate(n);
        y
    }

    /// Single causal pass; samples before the start are held at `x[0]`.
    fn apply(&self, x: &[f64]) -> Vec<f64> {
        let first = x[0];
        (0..x.len())
            .map(|i| {
                self.coeffs
                    .iter()
                    .enumerate()
                    .map(|(k, &b)| b * if k <= i { x[i - k] } else { first })
                    .sum()
            })
            .collect()
    }
}

/// Symmetric Hamming window of length `n`.
pub fn hamming_window(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let m = (n - 1) as f64;
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / m).cos())
        .collect()
}

/// Windowed-sinc low-pass. `cutoff` is relative to Nyquist (0..1).
/// Coefficients are normalised to unity DC gain and mirrored so the kernel
/// is exactly symmetric.
fn design_hamming_lowpass(cutoff: f64, num_taps: usize) -> Vec<f64> {
    let window = hamming_window(num_taps);
    let mid = (num_taps - 1) as f64 / 2.0;

    let mut coeffs = vec![0.0; num_taps];
    for i in 0..num_taps.div_ceil(2) {
        let m = i as f64 - mid;
        let h = cutoff * sinc(cutoff * m) * window[i];
        coeffs[i] = h;
        coeffs[num_taps - 1 - i] = h;
    }

    let sum: f64 = coeffs.iter().sum();
    for c in coeffs.iter_mut() {
        *c /= sum;
    }
    coeffs
}

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// `2·x[0] − x[pad..1]` ++ x ++ `2·x[n−1] − x[n−2..n−1−pad]`
fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * x[0] - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=pad).map(|i| 2.0 * x[n - 1] - x[n - 1 - i]));
    out
}
