//! Inbound invocation conversion.

use bytes::Bytes;
use hookwire_core::{GITHUB_DELIVERY_HEADER, GITHUB_EVENT_HEADER, WebhookRequest};
use lambda_http::request::RequestContext as ApiContext;
use lambda_http::{Body, Request};
use std::collections::HashMap;

/// An HTTP invocation as delivered by API Gateway, an ALB or a Function URL.
#[derive(Debug)]
pub struct LambdaRequest {
    /// HTTP method
    pub method: http::Method,
    /// Request path, without the query string
    pub path: String,
    /// Request headers
    pub headers: http::HeaderMap,
    /// Raw body; base64 bodies have already been decoded by the runtime.
    pub body: Bytes,
    /// API Gateway identifiers
    pub context: InvocationContext,
}

/// Identifiers of the invocation, used to correlate logs.
///
/// Only API Gateway events carry these; ALB and WebSocket events leave
/// every field empty.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    /// API Gateway request id
    pub request_id: Option<String>,
    /// Caller address as seen by API Gateway
    pub source_ip: Option<String>,
}

impl InvocationContext {
    fn from_api_context(ctx: &ApiContext) -> Self {
        match ctx {
            ApiContext::ApiGatewayV2(v2) => Self {
                request_id: v2.request_id.clone(),
                source_ip: v2.http.source_ip.clone(),
            },
            ApiContext::ApiGatewayV1(v1) => Self {
                request_id: v1.request_id.clone(),
                source_ip: v1.identity.source_ip.clone(),
            },
            _ => Self::default(),
        }
    }
}

impl LambdaRequest {
    /// Unpack a `lambda_http` request
    pub fn from_lambda_request(request: Request) -> Self {
        let (parts, body) = request.into_parts();

        let context = parts
            .extensions
            .get::<ApiContext>()
            .map(InvocationContext::from_api_context)
            .unwrap_or_default();

        let body = match body {
            Body::Empty => Bytes::new(),
            Body::Text(text) => Bytes::from(text),
            Body::Binary(raw) => Bytes::from(raw),
        };

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            body,
            context,
        }
    }

    /// Header lookup, case-insensitive. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The GitHub event name, if the delivery carries one.
    pub fn event_name(&self) -> Option<&str> {
        self.header(GITHUB_EVENT_HEADER)
    }

    /// The GitHub delivery GUID, if present.
    pub fn delivery_id(&self) -> Option<&str> {
        self.header(GITHUB_DELIVERY_HEADER)
    }

    /// Convert into the dispatcher's request type, dropping non-UTF-8 headers.
    pub fn into_webhook_request(self) -> WebhookRequest {
        let headers: HashMap<String, String> = self
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        WebhookRequest {
            headers,
            body: self.body,
        }
    }
}
