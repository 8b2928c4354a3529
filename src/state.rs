use std::path::PathBuf;

use anyhow::{Context, Result};

use tribo_cycles::prefs::{JsonPreferences, Preferences, PreferencesStore};
use tribo_cycles::{build_series_with_progress, report, ExtremaPolicy, MetricSeries, RunContext};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Run folder holding the `auto$<n>.csv` captures.
    pub input_dir: Option<PathBuf>,

    /// Folder receiving `result.csv` (optional).
    pub output_dir: Option<PathBuf>,

    /// Load field as typed; empty means the default load.
    pub load_text: String,

    /// Calibration fields as typed, persisted through `prefs_store`.
    pub friction_scale_text: String,
    pub amp_scale_text: String,

    pub policy: ExtremaPolicy,

    /// Result of the last successful run.
    pub series: Option<MetricSeries>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether `status_message` reports a failure.
    pub status_is_error: bool,

    prefs_store: JsonPreferences,
}

impl AppState {
    pub fn new(prefs_store: JsonPreferences) -> Self {
        let prefs = prefs_store.load().unwrap_or_else(|e| {
            log::warn!("Falling back to default preferences: {e}");
            Preferences::default()
        });
        Self {
            input_dir: None,
            output_dir: None,
            load_text: String::new(),
            friction_scale_text: prefs.friction_scale.to_string(),
            amp_scale_text: prefs.amp_scale.to_string(),
            policy: ExtremaPolicy::default(),
            series: None,
            status_message: None,
            status_is_error: false,
            prefs_store,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, err: &anyhow::Error) {
        log::error!("{err:#}");
        self.status_message = Some(format!("Error: {err:#}"));
        self.status_is_error = true;
    }

    /// Parse the calibration fields.
    pub fn preferences(&self) -> Result<Preferences> {
        let parse = |text: &str, name: &str| -> Result<f64> {
            let v: f64 = text
                .trim()
                .parse()
                .with_context(|| format!("{name} '{text}' is not a number"))?;
            anyhow::ensure!(v.is_finite(), "{name} must be finite");
            Ok(v)
        };
        Ok(Preferences {
            friction_scale: parse(&self.friction_scale_text, "friction scale")?,
            amp_scale: parse(&self.amp_scale_text, "amplitude scale")?,
        })
    }

    /// Persist the calibration fields.
    pub fn save_preferences(&mut self) {
        let result = self.preferences().and_then(|prefs| {
            self.prefs_store.save(&prefs)?;
            Ok(prefs)
        });
        match result {
            Ok(prefs) => self.set_status(format!(
                "Settings saved: friction scale {}, amplitude scale {}",
                prefs.friction_scale, prefs.amp_scale
            )),
            Err(e) => self.set_error(&e),
        }
    }

    /// Assemble the immutable run configuration from the form.
    pub fn run_context(&self) -> Result<RunContext> {
        let input = self
            .input_dir
            .clone()
            .context("Select a run folder first")?;
        let load = RunContext::parse_load(&self.load_text)?;
        let mut ctx = RunContext::new(input, &self.preferences()?, load).with_policy(self.policy);
        if let Some(out) = &self.output_dir {
            ctx = ctx.with_output_dir(out);
        }
        Ok(ctx)
    }

    /// Run the pipeline and, if an output folder is set, write the report.
    /// On failure the previous result is kept and no report is written.
    pub fn run(&mut self) {
        match self.try_run() {
            Ok(msg) => self.set_status(msg),
            Err(e) => self.set_error(&e),
        }
    }

    fn try_run(&mut self) -> Result<String> {
        let ctx = self.run_context()?;
        let series = build_series_with_progress(&ctx, |p| log::info!("{p}"))
            .with_context(|| format!("analysing {}", ctx.input_dir.display()))?;

        let mut msg = format!(
            "{} cycles, motor {} Hz, interval {} us",
            series.len(),
            series.params.motor_frequency_hz,
            (series.params.sampling_interval_s * 1e6).round()
        );
        if let Some(out) = &ctx.output_dir {
            let path = report::write_csv(&series, out).context("writing report")?;
            msg.push_str(&format!(", saved {}", path.display()));
        }
        self.series = Some(series);
        Ok(msg)
    }
}
