//! Errors raised while bridging dispatchers onto the Lambda runtime.

use thiserror::Error;

/// Result type for the Lambda adapter.
pub type Result<T> = std::result::Result<T, LambdaError>;

/// Lambda adapter errors.
#[derive(Debug, Error)]
pub enum LambdaError {
    /// A handler flagged its body as base64 but the body does not decode.
    #[error("Invalid base64 response body: {0}")]
    InvalidBase64Body(#[from] base64::DecodeError),

    /// The Lambda runtime loop stopped with an error.
    #[error("Lambda runtime error: {0}")]
    Runtime(String),
}

impl From<lambda_runtime::Error> for LambdaError {
    fn from(err: lambda_runtime::Error) -> Self {
        Self::Runtime(err.to_string())
    }
}
