//! # Hookwire Lambda
//!
//! AWS Lambda runtime adapter for Hookwire webhook dispatchers.
//!
//! Deploy a GitHub webhook receiver behind API Gateway, an ALB or a Lambda
//! Function URL.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hookwire_core::{Dispatcher, Event, Payload, WebhookResponse, handler_fn};
//! use hookwire_lambda::LambdaRuntime;
//!
//! #[tokio::main]
//! async fn main() -> hookwire_lambda::Result<()> {
//!     hookwire_lambda::init_tracing();
//!
//!     let dispatcher = Dispatcher::new();
//!     dispatcher.on_fields(
//!         Event::PullRequest,
//!         [("action", ["opened"])],
//!         handler_fn(|_: &Payload| Ok(WebhookResponse::ok("thanks for the pull request"))),
//!     );
//!
//!     LambdaRuntime::new(dispatcher).run().await
//! }
//! ```
//!
//! Every invocation is converted into a [`hookwire_core::WebhookRequest`],
//! dispatched, and the resulting response is mapped back field for field.
//! Responses flagged as base64 are decoded and returned as binary bodies.

mod error;
mod request;
mod response;
mod runtime;

pub use error::{LambdaError, Result};
pub use request::{InvocationContext, LambdaRequest};
pub use response::LambdaResponse;
pub use runtime::{LambdaConfig, LambdaRuntime, RequestHandler};

pub use lambda_http;
pub use lambda_runtime;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a JSON `tracing` subscriber for CloudWatch Logs.
///
/// Directives come from `RUST_LOG`; without it, dispatch spans and handler
/// events are logged at `info`. Calling this twice is harmless: the second
/// subscriber is discarded.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install_json_subscriber(filter);
}

/// Like [`init_tracing`], ignoring `RUST_LOG` in favour of `directives`
/// (for example `"warn,hookwire_core=debug"`).
pub fn init_tracing_with_level(directives: &str) {
    install_json_subscriber(EnvFilter::new(directives));
}

fn install_json_subscriber(filter: EnvFilter) {
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false),
        )
        .try_init();

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
