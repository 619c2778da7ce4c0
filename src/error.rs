//! Error types for walking, archiving, and uploading.

use thiserror::Error;

/// Result type for upload pipeline operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Errors that can occur anywhere in the upload pipeline.
///
/// Walk-level variants (`EnumerationFailure`, `FileReadFailure`) are normally
/// logged and absorbed by the walker; the rest reach the caller.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A directory's children could not be listed
    #[error("Failed to enumerate {path}: {message}")]
    EnumerationFailure { path: String, message: String },

    /// A single file's content could not be read
    #[error("Failed to read {path}: {message}")]
    FileReadFailure { path: String, message: String },

    /// Compressing a folder's files failed
    #[error("Failed to build archive: {0}")]
    ArchiveBuildFailure(String),

    /// The upload request failed or the server rejected it
    #[error("{}", transport_message(.status, .body))]
    TransportFailure { status: Option<u16>, body: String },

    /// The environment lacks a capability the flow needs
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// A folder selection that can't be turned into an archive
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A folder or directory name that would escape the input directory
    #[error("Unsafe path: {0}")]
    UnsafePath(String),

    /// Another upload flow is still running
    #[error("An upload is already in progress")]
    Busy,
}

fn transport_message(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("Upload failed ({}): {}", code, body),
        None => format!("Upload failed: {}", body),
    }
}

impl UploadError {
    pub fn enumeration(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        UploadError::EnumerationFailure {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn file_read(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        UploadError::FileReadFailure {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::TransportFailure {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for UploadError {
    fn from(err: zip::result::ZipError) -> Self {
        UploadError::ArchiveBuildFailure(err.to_string())
    }
}
