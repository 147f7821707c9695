//! Error types for tfplug

/// Failures of the value model: encoding, decoding and path navigation
#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Invalid attribute path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias for tfplug operations
pub type Result<T> = std::result::Result<T, TfplugError>;

impl From<String> for TfplugError {
    fn from(s: String) -> Self {
        TfplugError::Custom(s)
    }
}

impl From<&str> for TfplugError {
    fn from(s: &str) -> Self {
        TfplugError::Custom(s.to_string())
    }
}

impl From<serde_json::Error> for TfplugError {
    fn from(e: serde_json::Error) -> Self {
        TfplugError::DecodingError(e.to_string())
    }
}
