//! Error types for the engine's fallible edges.
//!
//! Extraction, ranking and rewriting are total and never return errors.
//! Only document (de)serialization can fail.

/// Errors from reading or writing rigger documents.
#[derive(Debug, thiserror::Error)]
pub enum RiggerError {
    /// A document could not be serialized or parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An overrides document had the wrong shape.
    #[error("Invalid overrides: {0}")]
    InvalidOverrides(String),
}

impl RiggerError {
    /// Create an overrides-shape error.
    pub fn invalid_overrides(msg: impl Into<String>) -> Self {
        Self::InvalidOverrides(msg.into())
    }
}

/// Result alias for engine operations that can fail.
pub type Result<T> = std::result::Result<T, RiggerError>;
