//! Default responses built by the dispatcher

use crate::{WebhookError, WebhookResponse};

/// Builds the responses the dispatcher returns on its own behalf
///
/// Both methods have defaults, so an application can override only the one
/// it cares about:
///
/// ```rust,ignore
/// struct JsonErrors;
///
/// impl ResponseAdapter for JsonErrors {
///     fn error(&self, err: &WebhookError) -> WebhookResponse {
///         WebhookResponse::internal_error(serde_json::json!({ "error": err.to_string() }).to_string())
///             .header("content-type", "application/json")
///     }
/// }
/// ```
pub trait ResponseAdapter: Send + Sync {
    /// Response for a failed delivery: status 500 with the error as body
    fn error(&self, err: &WebhookError) -> WebhookResponse {
        WebhookResponse::internal_error(err.to_string())
    }

    /// Response for a delivery that needed no handler: status 200 with the message as body
    fn success(&self, message: &str) -> WebhookResponse {
        WebhookResponse::ok(message)
    }
}

/// Adapter using the default responses
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResponseAdapter;

impl ResponseAdapter for DefaultResponseAdapter {}
