//! Error types for webhook dispatch

use thiserror::Error;

/// Errors that can occur while dispatching a webhook delivery
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The request did not carry a required header
    #[error("ERROR: no '{0}' header")]
    MissingHeader(String),

    /// Event name is not part of the known event set
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Payload could not be parsed into a typed event
    #[error("Payload error: {0}")]
    PayloadError(String),

    /// Typed payload could not be turned into a generic field map
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A registered handler reported a failure
    #[error("Handler failed: {0}")]
    HandlerFailed(String),

    /// Any other handler error
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl WebhookError {
    /// Build a handler failure from a message
    pub fn handler(message: impl Into<String>) -> Self {
        WebhookError::HandlerFailed(message.into())
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::PayloadError(err.to_string())
    }
}
