//! Cycle-metric extraction for reciprocating friction/wear test runs.
//!
//! A run is a folder of per-cycle logger captures (`auto$<n>.csv`). The
//! pipeline detects the acquisition parameters from the middle cycle,
//! designs one low-pass filter for the run, and reduces every cycle to a
//! friction coefficient, a displacement amplitude and a humidity reading.

pub mod analysis;
pub mod data;
pub mod error;
pub mod prefs;
pub mod report;

pub use analysis::reduce::ExtremaPolicy;
pub use analysis::series::{build_series, build_series_with_progress, Progress};
pub use data::model::{CycleMetric, MetricSeries, RunContext};
pub use error::{AnalysisError, Result};
