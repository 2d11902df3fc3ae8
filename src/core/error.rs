//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Every failure a submission attempt can end in is one of these variants.
/// The `Display` output is the single user-visible message shown by the UI.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The picker was cancelled by the user or the platform refused it.
    #[error("Selection cancelled or not supported")]
    SelectionCancelled,

    /// The user confirmed a selection that contains no files.
    #[error("No files selected")]
    EmptySelection,

    /// One or more selected files carry an extension outside the allow-list.
    #[error(
        "Unsupported file extensions: {}. Allowed extensions: {}",
        .invalid.join(", "),
        .allowed.join(", ")
    )]
    UnsupportedExtensions {
        invalid: Vec<String>,
        allowed: Vec<String>,
    },

    /// Network, DNS or timeout failure while talking to the analysis service.
    #[error("{0}")]
    Transport(String),

    /// The analysis service answered with a non-success status code.
    #[error("Server responded with status {status}")]
    Server { status: u16 },

    /// The response body did not have the expected shape.
    #[error("Invalid response from server: {0}")]
    Parse(String),

    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// A file or directory name that is not valid UTF-8.
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    /// The archive container could not be written.
    #[error("Failed to build archive: {0}")]
    Archive(String),

    /// Represents an error that occurred when a Tokio task was joined.
    /// This is often due to a task panicking or being cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CoreError {
    /// A short, stable category name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::SelectionCancelled => "selection",
            CoreError::EmptySelection => "empty_selection",
            CoreError::UnsupportedExtensions { .. } => "validation",
            CoreError::Transport(_) => "transport",
            CoreError::Server { .. } => "server",
            CoreError::Parse(_) => "parse",
            CoreError::Io(..) | CoreError::NonUtf8Path(_) => "io",
            CoreError::Archive(_) | CoreError::Join(_) => "archive",
        }
    }

    /// Returns `true` if the failure is fatal for the submission it occurred in.
    ///
    /// Everything else can be recovered by starting over from selection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Parse(_))
    }
}

impl From<zip::result::ZipError> for CoreError {
    fn from(err: zip::result::ZipError) -> Self {
        CoreError::Archive(err.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Transport(err.to_string())
    }
}
