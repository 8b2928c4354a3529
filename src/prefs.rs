use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// File name used when no explicit preferences path is given.
pub const DEFAULT_PREFS_FILE: &str = "graph_maker.json";

/// Environment variable overriding the preferences path.
pub const PREFS_ENV: &str = "TRIBO_PREFS";

// ---------------------------------------------------------------------------
// Preferences – persisted calibration factors
// ---------------------------------------------------------------------------

/// Calibration multipliers kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Force channel volts → newtons.
    pub friction_scale: f64,
    /// Displacement channel volts → micrometres.
    pub amp_scale: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            friction_scale: 1.0,
            amp_scale: 1.0,
        }
    }
}

/// Where preferences live. Loaded once per run.
pub trait PreferencesStore {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Preferences as a pretty-printed JSON document at an explicit path.
#[derive(Debug, Clone)]
pub struct JsonPreferences {
    path: PathBuf,
}

impl JsonPreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$TRIBO_PREFS` if set, else `graph_maker.json` in the working directory.
    pub fn from_env() -> Self {
        let path = std::env::var_os(PREFS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, reason: impl ToString) -> AnalysisError {
        AnalysisError::Preferences {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl PreferencesStore for JsonPreferences {
    /// A missing file yields the defaults.
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            log::info!("No preferences at {}, using defaults", self.path.display());
            return Ok(Preferences::default());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        let prefs: Preferences = serde_json::from_str(&text).map_err(|e| self.error(e))?;
        if !prefs.friction_scale.is_finite() || !prefs.amp_scale.is_finite() {
            return Err(self.error("scales must be finite numbers"));
        }
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        let text = serde_json::to_string_pretty(prefs).map_err(|e| self.error(e))?;
        std::fs::write(&self.path, text).map_err(|e| self.error(e))?;
        log::info!(
            "Saved preferences to {}: friction_scale {}, amp_scale {}",
            self.path.display(),
            prefs.friction_scale,
            prefs.amp_scale
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferences::new(dir.path().join("none.json"));
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferences::new(dir.path().join("nested/graph_maker.json"));
        let prefs = Preferences {
            friction_scale: 4.9,
            amp_scale: 12.5,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, r#"{ "friction_scale": 2.0, "load": 9.8 }"#).unwrap();
        let prefs = JsonPreferences::new(&path).load().unwrap();
        assert_eq!(prefs.friction_scale, 2.0);
        assert_eq!(prefs.amp_scale, 1.0);
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, "{ friction_scale: ").unwrap();
        assert!(matches!(
            JsonPreferences::new(&path).load(),
            Err(AnalysisError::Preferences { .. })
        ));
    }
}
