//! Transport-neutral request and response types

use bytes::Bytes;
use std::collections::HashMap;

/// Inbound webhook delivery as seen by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Raw request body.
    pub body: Bytes,
}

impl WebhookRequest {
    /// Create a request from a raw body.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Get a header value, ignoring ASCII case of the name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(|s| s.as_str())
    }
}

/// Response produced by handlers and returned to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: String,
    /// Whether `body` holds base64 encoded binary data.
    pub is_base64_encoded: bool,
}

impl WebhookResponse {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// Create an OK response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Create an internal server error response.
    pub fn internal_error(body: impl Into<String>) -> Self {
        Self::new(500, body)
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Mark body as base64 encoded.
    pub fn base64(mut self) -> Self {
        self.is_base64_encoded = true;
        self
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Default for WebhookResponse {
    fn default() -> Self {
        Self::ok(String::new())
    }
}
