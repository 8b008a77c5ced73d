//! Invocation loop bridging `lambda_http` to webhook dispatchers.

use hookwire_core::Dispatcher;
use lambda_http::{Body, Error, Request, Response, run, service_fn};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{LambdaRequest, LambdaResponse};

/// Logging switches for the invocation loop.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    /// Log event name, delivery id and API Gateway request id per invocation.
    pub log_deliveries: bool,
    /// Log the status code returned for each invocation.
    pub log_responses: bool,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            log_deliveries: true,
            log_responses: false,
        }
    }
}

impl LambdaConfig {
    /// Enable per-delivery logging.
    pub fn log_deliveries(mut self, enabled: bool) -> Self {
        self.log_deliveries = enabled;
        self
    }

    /// Enable response status logging.
    pub fn log_responses(mut self, enabled: bool) -> Self {
        self.log_responses = enabled;
        self
    }
}

/// Serves a [`Dispatcher`] (or any other [`RequestHandler`]) on the Lambda
/// runtime.
pub struct LambdaRuntime<H> {
    handler: Arc<H>,
    config: LambdaConfig,
}

impl<H: RequestHandler + 'static> LambdaRuntime<H> {
    /// Create a runtime with default logging.
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            config: LambdaConfig::default(),
        }
    }

    /// Set the runtime configuration.
    pub fn with_config(mut self, config: LambdaConfig) -> Self {
        self.config = config;
        self
    }

    /// Poll the Lambda runtime API for invocations until it shuts down.
    pub async fn run(self) -> crate::Result<()> {
        info!("Starting Hookwire Lambda runtime");

        let Self { handler, config } = self;
        run(service_fn(move |request: Request| {
            invoke(handler.clone(), config.clone(), request)
        }))
        .await?;

        Ok(())
    }
}

/// Anything that can answer a Lambda HTTP invocation.
///
/// Implemented for [`Dispatcher`] and for async closures taking a
/// [`LambdaRequest`].
#[async_trait::async_trait]
pub trait RequestHandler: Send + Sync {
    /// Answer one invocation.
    async fn handle(&self, request: LambdaRequest) -> LambdaResponse;
}

#[async_trait::async_trait]
impl RequestHandler for Dispatcher {
    async fn handle(&self, request: LambdaRequest) -> LambdaResponse {
        let response = self.dispatch(&request.into_webhook_request()).await;

        LambdaResponse::try_from(response).unwrap_or_else(|e| {
            error!("Unable to convert webhook response: {}", e);
            LambdaResponse::internal_error(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl<F, Fut> RequestHandler for F
where
    F: Fn(LambdaRequest) -> Fut + Send + Sync,
    Fut: Future<Output = LambdaResponse> + Send,
{
    async fn handle(&self, request: LambdaRequest) -> LambdaResponse {
        (self)(request).await
    }
}

async fn invoke<H: RequestHandler>(
    handler: Arc<H>,
    config: LambdaConfig,
    request: Request,
) -> Result<Response<Body>, Error> {
    let request = LambdaRequest::from_lambda_request(request);

    if config.log_deliveries {
        debug!(
            event = request.event_name().unwrap_or("-"),
            delivery = request.delivery_id().unwrap_or("-"),
            request_id = ?request.context.request_id,
            source_ip = ?request.context.source_ip,
            "Received webhook invocation"
        );
    }

    let response = handler.handle(request).await;

    if config.log_responses {
        debug!(status = response.status, "Webhook invocation complete");
    }

    Ok(response.into_lambda_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_core::{Event, WebhookError, WebhookResponse};

    fn request(event: &str, body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("x-github-event", event)
            .body(Body::Text(body.to_string()))
            .unwrap()
    }

    fn text(response: &Response<Body>) -> &str {
        match response.body() {
            Body::Text(s) => s.as_str(),
            _ => "",
        }
    }

    #[tokio::test]
    async fn test_dispatcher_handles_request() {
        let dispatcher = Dispatcher::new();
        dispatcher.on_fn(Event::Ping, |p| {
            let zen = p.data().as_ping().and_then(|ping| ping.zen.clone());
            Ok(WebhookResponse::ok(zen.unwrap_or_default()))
        });

        let response = invoke(
            Arc::new(dispatcher),
            LambdaConfig::default(),
            request("ping", r#"{"zen":"Design for failure.","hook_id":1}"#),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(text(&response), "Design for failure.");
    }

    #[tokio::test]
    async fn test_dispatcher_error_becomes_500() {
        let dispatcher = Dispatcher::new();
        dispatcher.on_fn(Event::Push, |_| Err(WebhookError::handler("deploy failed")));

        let response = invoke(
            Arc::new(dispatcher),
            LambdaConfig::default().log_responses(true),
            request("push", r#"{"ref":"refs/heads/main","before":"a","after":"b"}"#),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(text(&response), "Handler failed: deploy failed");
    }

    #[tokio::test]
    async fn test_invalid_base64_from_handler() {
        let dispatcher = Dispatcher::new();
        dispatcher.on_fn(Event::Push, |_| Ok(WebhookResponse::ok("%%%").base64()));

        let response = RequestHandler::handle(
            &dispatcher,
            LambdaRequest::from_lambda_request(request(
                "push",
                r#"{"ref":"refs/tags/v1","before":"a","after":"b"}"#,
            )),
        )
        .await;

        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn test_closure_handler() {
        let handler = |req: LambdaRequest| async move {
            LambdaResponse::new(200, req.header("x-github-event").unwrap_or("").to_string())
        };

        let response = invoke(
            Arc::new(handler),
            LambdaConfig::default().log_deliveries(false),
            request("watch", "{}"),
        )
        .await
        .unwrap();

        assert_eq!(text(&response), "watch");
    }

    #[test]
    fn test_config_setters() {
        let config = LambdaConfig::default().log_deliveries(false).log_responses(true);
        assert!(!config.log_deliveries);
        assert!(config.log_responses);
    }
}
