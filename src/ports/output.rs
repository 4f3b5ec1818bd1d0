//! Output port: Trait for writing task artifacts.
//!
//! This trait abstracts the platform output directory from the application logic.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Error type for output operations.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The `computed.json` manifest read by the platform worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "deterministic-output-path")]
    pub deterministic_output_path: PathBuf,

    #[serde(rename = "error-message", skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
}

impl Manifest {
    #[must_use]
    pub fn success(path: impl Into<PathBuf>) -> Self {
        Self {
            deterministic_output_path: path.into(),
            error_message: None,
        }
    }

    #[must_use]
    pub fn failure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            deterministic_output_path: path.into(),
            error_message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

/// Trait for task output storage.
pub trait OutputStore {
    /// Directory all artifacts are written to.
    fn output_dir(&self) -> &Path;

    /// Write a result artifact and return its full path.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    fn write_result(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, OutputError>;

    /// Write the `computed.json` manifest.
    ///
    /// # Errors
    /// Returns error if the manifest cannot be serialized or written.
    fn write_manifest(&self, manifest: &Manifest) -> Result<(), OutputError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_keys() {
        let ok = serde_json::to_value(Manifest::success("/iexec_out/result.txt")).expect("json");
        assert_eq!(ok["deterministic-output-path"], "/iexec_out/result.txt");
        assert!(ok.get("error-message").is_none());

        let err = serde_json::to_value(Manifest::failure("/iexec_out/result.txt", "boom")).expect("json");
        assert_eq!(err["error-message"], "boom");
    }
}
