//! Outbound response conversion.

use crate::LambdaError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hookwire_core::WebhookResponse;
use lambda_http::{Body, Response};
use std::collections::HashMap;

/// Response handed back to the Lambda runtime.
///
/// Binary bodies are re-encoded as base64 by `lambda_http` on the way out.
#[derive(Debug)]
pub struct LambdaResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Text or binary body
    pub body: Body,
}

impl LambdaResponse {
    /// A text response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Body::Text(body.into()),
        }
    }

    /// A binary response.
    pub fn binary(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Body::Binary(body.into()),
        }
    }

    /// A 500 response with `message` as body
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Build the `lambda_http` response; invalid headers are dropped
    pub fn into_lambda_response(self) -> Response<Body> {
        let headers = self.headers;
        let mut response = Response::new(self.body);
        *response.status_mut() = http::StatusCode::from_u16(self.status)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        for (name, value) in headers {
            let parsed = (
                http::HeaderName::from_bytes(name.as_bytes()),
                http::HeaderValue::from_str(&value),
            );
            match parsed {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}

/// Maps every field across; a body flagged as base64 is decoded into a
/// binary body.
impl TryFrom<WebhookResponse> for LambdaResponse {
    type Error = LambdaError;

    fn try_from(response: WebhookResponse) -> Result<Self, Self::Error> {
        let body = if response.is_base64_encoded {
            Body::Binary(STANDARD.decode(response.body.as_bytes())?)
        } else {
            Body::Text(response.body)
        };

        Ok(Self {
            status: response.status,
            headers: response.headers,
            body,
        })
    }
}
