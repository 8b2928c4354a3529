//! Error types for the cycle-metric pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Every variant is fatal to a run: a partially processed run would
/// produce a misleading trend series, so nothing is recovered per file.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input/output directory missing, unreadable, or without captures.
    #[error("invalid input path {path}: {reason}")]
    InvalidInputPath { path: PathBuf, reason: String },

    /// A file in the run directory does not carry an `auto$<n>.csv` index.
    #[error("malformed capture filename: {path}")]
    MalformedFilename { path: PathBuf },

    /// Missing columns, too few rows, or undecodable content.
    #[error("malformed capture {path}: {reason}")]
    MalformedCapture { path: PathBuf, reason: String },

    /// Cutoff is zero, negative, non-finite, or at/above Nyquist.
    #[error("invalid filter design: cutoff {cutoff_hz} Hz, nyquist {nyquist_hz} Hz")]
    InvalidFilterDesign { cutoff_hz: f64, nyquist_hz: f64 },

    /// Sampling interval derived from the timestamps is zero or negative.
    #[error("degenerate sampling rate in {path}: interval {interval_us} us")]
    DegenerateSamplingRate { path: PathBuf, interval_us: f64 },

    /// Invalid run parameter supplied by the caller (e.g. load text).
    #[error("invalid run parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Preferences document could not be read or written.
    #[error("preferences {path}: {reason}")]
    Preferences { path: PathBuf, reason: String },

    /// Filesystem failure outside capture parsing.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedCapture {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short stable name of the error kind, for status lines and exit messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInputPath { .. } => "InvalidInputPath",
            AnalysisError::MalformedFilename { .. } => "MalformedFilename",
            AnalysisError::MalformedCapture { .. } => "MalformedCapture",
            AnalysisError::InvalidFilterDesign { .. } => "InvalidFilterDesign",
            AnalysisError::DegenerateSamplingRate { .. } => "DegenerateSamplingRate",
            AnalysisError::InvalidParameter { .. } => "InvalidParameter",
            AnalysisError::Preferences { .. } => "Preferences",
            AnalysisError::Io { .. } => "Io",
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
