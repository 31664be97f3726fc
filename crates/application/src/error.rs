//! Application error types

use beacon_domain::DomainError;
use thiserror::Error;

use crate::ports::StoreError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A persistence operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// No user is currently active.
    #[error("no active user")]
    NoActiveUser,

    /// The operation requires the admin user.
    #[error("admin access required")]
    AdminRequired,
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
