//! File-backed candidate store: a JSON array of candidate objects.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::Candidate;

/// How many candidates the sample endpoint returns.
pub const SAMPLE_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("candidates file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read candidates file: {0}")]
    Io(#[from] std::io::Error),

    #[error("error parsing candidates file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Load every candidate from the JSON store at `path`.
pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>, StoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(StoreError::Io(e)),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Load the first [`SAMPLE_SIZE`] candidates, for quick smoke tests.
pub fn sample_candidates(path: &Path) -> Result<Vec<Candidate>, StoreError> {
    let mut all = load_candidates(path)?;
    all.truncate(SAMPLE_SIZE);
    Ok(all)
}
