//! Error types for the todo and user API clients.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." Other 4xx responses are `Rejected` (validation, conflicts), and
//! everything else non-2xx lands in `Server`. Failures that never reached the
//! server are `Transport`.

use thiserror::Error;

/// Errors returned by the clients, services and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, DNS, timeout.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found: {message}")]
    NotFound { message: String },

    /// The server returned a 4xx other than 404.
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The server returned a 5xx or any other non-success status.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request was refused locally before any I/O.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the on-disk local store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from resolving the default actor: the lookup or the write.
#[derive(Debug, Error)]
pub enum ActorError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
