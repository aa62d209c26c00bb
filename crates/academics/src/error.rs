use thiserror::Error;

use academia_core::DomainError;

/// Client-enforced domain precondition failures.
///
/// These are raised before any request is built and never reach the transport.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcademicError {
    #[error("grade {value} is outside the 0-20 scale")]
    OutOfRange { value: f64 },

    #[error("missing required reference: {0}")]
    MissingReference(&'static str),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
