use thiserror::Error;

use crate::mailer::MailError;
use crate::validate::ValidationErrors;

/// Errors produced by the domain layer.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Persistence failure.
    #[error("Store error: {0}")]
    Store(#[from] gazette_store::StoreError),

    /// Mail delivery failure, surfaced after the retry was exhausted.
    #[error("Mail delivery failed: {0}")]
    Mail(#[from] MailError),

    /// Rejected form input; nothing was written.
    #[error("Validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DomainError>;
