//! Error types for dependency graph operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dependency graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing dependency graph documents.
///
/// Graph queries (closures, lookups, merges) never fail: missing projects and
/// dangling references degrade to empty results.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The persisted document has an invalid structure.
    #[error("Invalid restore graph document at '{path}': {message}")]
    #[diagnostic(
        code(dgspec::model::document_parse),
        help("Regenerate the restore graph file or fix the value at the reported path")
    )]
    DocumentParse {
        /// JSON pointer to the offending node (e.g. `/projects/A/restore`).
        path: String,
        /// Description of what is invalid.
        message: String,
    },

    /// A package version or version range could not be parsed.
    #[error("Invalid version '{value}': {message}")]
    #[diagnostic(
        code(dgspec::model::invalid_version),
        help("Use a version like '1.0.0' or a range like '[1.0.0, 2.0.0)'")
    )]
    InvalidVersion {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(dgspec::model::io_error),
        help("Check that the restore graph path exists and is readable/writable")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// JSON syntax error.
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(dgspec::model::json_error),
        help("Ensure the restore graph file contains valid JSON")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },
}

impl Error {
    pub(crate) fn document(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn version(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersion {
            value: value.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}
