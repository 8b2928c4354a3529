/// Analysis layer: parameter detection, filtering, and cycle reduction.
///
/// ```text
///   representative Capture ──► params ──► lowpass (101-tap FIR)
///                                              │
///   every Capture ─────────────────────► reduce (filtfilt + extrema)
///                                              │
///                                              ▼
///                                   series → MetricSeries
/// ```

pub mod lowpass;
pub mod params;
pub mod reduce;
pub mod series;
