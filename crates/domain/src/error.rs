//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The environment name is not one of the known environments.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// A request body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    /// An API name collides with an existing definition.
    #[error("API name already exists: {0}")]
    DuplicateName(String),

    /// The named API definition does not exist.
    #[error("API not found: {0}")]
    ApiNotFound(String),

    /// A username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// No user with this name is logged in.
    #[error("user not logged in: {0}")]
    UserNotLoggedIn(String),

    /// A row mapping references a column the sheet does not have.
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
