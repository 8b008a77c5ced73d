//! Handler trait and closure adapter

use crate::{Payload, Result, WebhookResponse};
use async_trait::async_trait;

/// Handles deliveries of the event it is registered for
///
/// Returning an error stops dispatch: handlers registered after this one are
/// not invoked for the current delivery.
///
/// ```rust,ignore
/// struct LabelNewPrs;
///
/// #[async_trait]
/// impl EventHandler for LabelNewPrs {
///     async fn handle(&self, payload: &Payload) -> Result<WebhookResponse> {
///         let pr = payload.data().as_pull_request().expect("registered for pull_request");
///         Ok(WebhookResponse::ok(format!("labelled #{}", pr.number)))
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle the delivery
    async fn handle(&self, payload: &Payload) -> Result<WebhookResponse>;
}

/// Handler backed by a synchronous closure, see [`handler_fn`]
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as an [`EventHandler`]
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&Payload) -> Result<WebhookResponse> + Send + Sync,
{
    HandlerFn { f }
}

#[async_trait]
impl<F> EventHandler for HandlerFn<F>
where
    F: Fn(&Payload) -> Result<WebhookResponse> + Send + Sync,
{
    async fn handle(&self, payload: &Payload) -> Result<WebhookResponse> {
        (self.f)(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Event, EventPayload, WebhookError};

    fn ping() -> Payload {
        Payload::new(Event::Ping, EventPayload::Other(Default::default()))
    }

    #[tokio::test]
    async fn test_handler_fn_success() {
        let handler = handler_fn(|p: &Payload| Ok(WebhookResponse::ok(p.event().to_string())));
        let response = handler.handle(&ping()).await.unwrap();
        assert_eq!(response.body, "ping");
    }

    #[tokio::test]
    async fn test_handler_fn_failure() {
        let handler = handler_fn(|_: &Payload| Err(WebhookError::handler("nope")));
        let err = handler.handle(&ping()).await.unwrap_err();
        assert_eq!(err.to_string(), "Handler failed: nope");
    }
}
