//! Error types for network construction, training and export
//!
//! Argument errors (`InvalidTopology`, `InvalidInput`, `InvalidParameters`) are
//! raised before any graph state is touched. I/O and config errors come only
//! from the `config`, `architecture` and `export` modules.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Main error type for network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Layer list or input count cannot form a network, or the operation
    /// needs a different output layer size
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Input vector length does not match the number of network inputs
    #[error("Invalid input: expected {expected} values, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    /// Training or export parameters out of range
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// File or process I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration
    #[error("JSON parsing error: {0}")]
    Config(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn topology(message: impl Into<String>) -> Self {
        NetworkError::InvalidTopology(message.into())
    }

    pub(crate) fn parameters(message: impl Into<String>) -> Self {
        NetworkError::InvalidParameters(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = NetworkError::InvalidInput {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Invalid input: expected 2 values, got 3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: NetworkError = io.into();
        assert!(matches!(err, NetworkError::Io(_)));
    }
}
