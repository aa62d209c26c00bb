//! Errors raised by the pure domain layer.

use thiserror::Error;

/// Rejection of a value or a state change before it reaches the API.
///
/// Only client-side checks produce these. Server verdicts are classified by
/// the client crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input that can never be accepted as given (blank name, bad email).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A change that would break a rule of an existing record.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier that does not parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
