/// Data layer: run discovery, capture loading, and core types.
///
/// Architecture:
/// ```text
///   run folder (auto$0.csv, auto$1.csv, ...)
///        │
///        ▼
///   ┌───────────┐
///   │ discovery │  list *.csv → CycleFileSet ordered by cycle index
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  Shift-JIS table → Capture (one per cycle)
///   └──────────┘
///        │
///        ▼
///   analysis::series  → MetricSeries
/// ```

pub mod discovery;
pub mod loader;
pub mod model;
