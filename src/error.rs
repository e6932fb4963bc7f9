//! Error types shared by the list and form cores

use thiserror::Error;

use crate::state::FieldError;

/// Transport or server failure while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    #[error("server returned status {0}")]
    Status(u16),

    /// The server answered with GraphQL errors.
    #[error("server error: {0}")]
    Server(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Errors raised by a list controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Another fetch is still pending on this controller.
    #[error("a fetch is already in flight")]
    Busy,

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// The controller's view was unmounted.
    #[error("list is no longer mounted")]
    Unmounted,
}

/// Errors raised by a form binder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// One or more fields have errors; nothing was submitted.
    #[error("validation failed for: {}", fields.join(", "))]
    ValidationBlocked { fields: Vec<String> },

    /// The same field name was registered twice with a different transform.
    #[error("field '{0}' registered twice with a different transform")]
    ConflictingRegistration(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("form is no longer mounted")]
    Unmounted,
}

/// Failure of a create mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The backend rejected the input; errors are keyed by field.
    #[error("{} field error(s)", .0.len())]
    Fields(Vec<FieldError>),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
