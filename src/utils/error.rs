//! Error Handling Module
//!
//! Defines custom error types for the library.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for classification operations
#[derive(Error, Debug)]
pub enum Error {
    /// Error loading or decoding an image
    #[error("Failed to load image at '{0}': {1}")]
    ImageLoad(PathBuf, String),

    /// Error loading or typing the saved model
    #[error("Model error: {0}")]
    Model(String),

    /// Error during an inference call
    #[error("Inference error: {0}")]
    Inference(String),

    /// Error resolving or parsing the label list
    #[error("Label error: {0}")]
    Labels(String),

    /// Label list cannot be aligned with the model output
    #[error("Label list has {found} entries but the model predicts {expected} classes")]
    LabelMismatch {
        /// Class count reported by the model signature
        expected: usize,
        /// Entry count of the parsed label list
        found: usize,
    },

    /// HTTP failure while fetching a remote resource
    #[error("Failed to fetch '{0}': {1}")]
    Http(String, String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Other(format!("Serialization error: {err}"))
    }
}

/// Convenience Result type for classification operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Model("test error".to_string());
        assert_eq!(err.to_string(), "Model error: test error");
    }

    #[test]
    fn test_label_mismatch_display() {
        let err = Error::LabelMismatch {
            expected: 1000,
            found: 998,
        };
        let msg = err.to_string();
        assert!(msg.contains("998"));
        assert!(msg.contains("1000"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_image_load_error() {
        let path = PathBuf::from("/path/to/image.jpg");
        let err = Error::ImageLoad(path, "file not found".to_string());
        assert!(err.to_string().contains("image.jpg"));
    }
}
