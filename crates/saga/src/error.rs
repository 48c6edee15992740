//! Saga error types.

use common::SagaId;
use thiserror::Error;

/// Errors raised around saga execution.
///
/// Running a saga never fails with one of these: the terminal
/// [`SagaResult`](crate::SagaResult) is the only signal a run produces.
/// They surface from configuration parsing and journal access.
#[derive(Debug, Error)]
pub enum SagaError {
    /// A configuration value could not be parsed.
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// The journal rejected an operation.
    #[error("Journal error for saga {saga_id}: {reason}")]
    Journal { saga_id: SagaId, reason: String },
}

impl SagaError {
    /// Creates an [`SagaError::InvalidConfig`] error.
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SagaError::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
