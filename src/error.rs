//! Error handling for VoiceFx
//!
//! One error enum for the whole crate. Stages validate their own parameters
//! eagerly and return the first failure; the pipeline never recovers or
//! retries.

use thiserror::Error;

/// Result type alias for VoiceFx operations
pub type Result<T> = std::result::Result<T, VoiceFxError>;

/// Main error type for VoiceFx operations
#[derive(Error, Debug)]
pub enum VoiceFxError {
    // Parameter Errors
    #[error("Invalid parameter {param}: got {value}, expected {expected}")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Audio Errors
    #[error("Audio buffer contains no samples")]
    EmptyBuffer,

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VoiceFxError {
    /// Convenience constructor for out-of-range parameters
    pub fn invalid_parameter(
        param: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        VoiceFxError::InvalidParameter {
            param: param.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            VoiceFxError::InvalidParameter { .. } => "INVALID_PARAMETER",
            VoiceFxError::EmptyBuffer => "EMPTY_BUFFER",
            VoiceFxError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            VoiceFxError::InvalidAudio { .. } => "INVALID_AUDIO",
            VoiceFxError::FileNotFound { .. } => "FILE_NOT_FOUND",
            VoiceFxError::Io(_) => "IO_ERROR",
            VoiceFxError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
