//! Error types for rkdeveloptool option handling

use thiserror::Error;

/// Errors in rkdeveloptool backend options
#[derive(Debug, Error)]
pub enum RkDevelopToolError {
    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },
}

/// Result type for option parsing
pub type Result<T> = std::result::Result<T, RkDevelopToolError>;
