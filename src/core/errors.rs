use thiserror::Error;
use super::types::UploadStatus;

/// 文件校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File size exceeds {}MB limit", format_megabytes(.limit))]
    FileTooLarge {
        limit: u64,
    },

    #[error("File type {file_type} is not allowed")]
    TypeNotAllowed {
        file_type: String,
    },
}

fn format_megabytes(bytes: &u64) -> String {
    format!("{:.1}", *bytes as f64 / (1024.0 * 1024.0))
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to get upload URL: status {status}")]
    Destination {
        status: u16,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Upload failed with status {status}")]
    Transfer {
        status: u16,
    },

    #[error("File changed since selection: expected {expected} bytes, found {actual}")]
    FileChanged {
        expected: u64,
        actual: u64,
    },

    #[error("HTTP error {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: UploadStatus,
        to: UploadStatus,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Error alias
pub type Result<T, E = UploadError> = std::result::Result<T, E>;
