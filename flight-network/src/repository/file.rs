//! Flight repository backed by a JSON file.
//!
//! Useful for development and testing without the CRUD service running.
//! The file is re-read on every call, so editing it and triggering a
//! refresh picks up the change.

use std::path::{Path, PathBuf};

use crate::domain::FlightRecord;

use super::FlightsPayload;
use super::error::RepositoryError;

/// Reads flights from a JSON file holding either an array of records or
/// an object with a `flights` array.
#[derive(Debug, Clone)]
pub struct JsonFileFlightRepository {
    path: PathBuf,
}

impl JsonFileFlightRepository {
    /// Create a repository for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    pub async fn load(&self) -> Result<Vec<FlightRecord>, RepositoryError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RepositoryError::Io {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let payload: FlightsPayload =
            serde_json::from_str(&json).map_err(|e| RepositoryError::Json {
                message: format!("{}: {}", self.path.display(), e),
            })?;

        Ok(payload.into_records())
    }
}
