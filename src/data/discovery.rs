use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};

/// Literal token preceding the cycle index in every capture filename.
pub const CAPTURE_TOKEN: &str = "auto$";

/// Extension of capture files. Other files in the run folder are ignored.
pub const CAPTURE_EXTENSION: &str = "csv";

/// One capture file and the cycle index parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFile {
    pub index: u64,
    pub path: PathBuf,
}

/// The capture files of one run, sorted by numeric cycle index.
#[derive(Debug, Clone)]
pub struct CycleFileSet {
    files: Vec<CycleFile>,
}

/// Parse the cycle index out of `...auto$<digits>.csv`.
pub fn cycle_index(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(&format!(".{CAPTURE_EXTENSION}"))?;
    let (_, digits) = stem.rsplit_once(CAPTURE_TOKEN)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn is_capture_candidate(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(CAPTURE_EXTENSION)
}

impl CycleFileSet {
    /// List `dir` and order its `*.csv` files by cycle index.
    ///
    /// Any csv file without a parsable index aborts discovery: the folder
    /// does not hold a coherent run.
    pub fn discover(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AnalysisError::InvalidInputPath {
                path: dir.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let entries = std::fs::read_dir(dir).map_err(|e| AnalysisError::InvalidInputPath {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AnalysisError::io(dir, e))?;
            let path = entry.path();
            if path.is_file() && is_capture_candidate(&path) {
                paths.push(path);
            }
        }

        let set = Self::from_paths(paths).map_err(|e| match e {
            AnalysisError::InvalidInputPath { reason, .. } => AnalysisError::InvalidInputPath {
                path: dir.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        log::info!("Found {} capture files in {}", set.len(), dir.display());
        Ok(set)
    }

    /// Order an already-listed set of capture paths.
    ///
    /// The result does not depend on the order of `paths`. Equal indices
    /// (`auto$01.csv` next to `auto$1.csv`) fall back to path order.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Result<Self> {
        let mut files = paths
            .into_iter()
            .map(|path| match cycle_index(&path) {
                Some(index) => Ok(CycleFile { index, path }),
                None => Err(AnalysisError::MalformedFilename { path }),
            })
            .collect::<Result<Vec<_>>>()?;

        if files.is_empty() {
            return Err(AnalysisError::InvalidInputPath {
                path: PathBuf::new(),
                reason: "no capture files".to_string(),
            });
        }

        files.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CycleFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.path.as_path()).collect()
    }

    /// Position of the cycle used for parameter detection: the middle one,
    /// away from start-up and shut-down transients.
    pub fn representative_position(&self) -> usize {
        self.files.len() / 2
    }

    pub fn representative(&self) -> &CycleFile {
        &self.files[self.representative_position()]
    }
}
