//! Error handling for vunorm
//!
//! All pipeline failures are terminal: the run aborts with a diagnostic and
//! a non-zero exit status. There is no retry layer because every operation
//! is a single-shot local-file computation.

use thiserror::Error;

/// Result type alias for vunorm operations
pub type Result<T> = std::result::Result<T, VunormError>;

/// Main error type for vunorm operations
#[derive(Error, Debug)]
pub enum VunormError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Parameter Errors
    #[error("Invalid parameter {param}: got {value}, expected {expected}")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VunormError::FileNotFound {
            path: "test.wav".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "File not found: test.wav");
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = VunormError::InvalidParameter {
            param: "release_secs".to_string(),
            value: "0".to_string(),
            expected: "> 0 seconds".to_string(),
        };
        assert!(err.to_string().contains("release_secs"));
        assert!(err.to_string().contains("> 0 seconds"));
    }
}
