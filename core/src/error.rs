//! Error types for the Haras API client.
//!
//! `NotFound` keeps its own variant because screens routinely branch on it.
//! Every other non-2xx lands in `HttpError`. `Rejected` covers the backend
//! answering 2xx with a failure envelope (`status: "error"` or
//! `success: false`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404. `body` holds the
    /// envelope message when there is one, otherwise the raw body.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The envelope said the call failed.
    #[error("request rejected: {message}")]
    Rejected { message: String },

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A stall assignment was refused before hitting the network.
    #[error("stall assignment conflict: {0}")]
    Conflict(String),

    /// A dispatched operation carried unusable arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ApiError {
    /// HTTP status associated with the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

