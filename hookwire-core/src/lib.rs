//! GitHub webhook dispatch for Hookwire
//!
//! This crate maps webhook event types to ordered lists of handlers and runs
//! them against a single parsed payload per delivery.
//!
//! # Features
//!
//! - **Typed Events**: every known GitHub event name as an [`Event`] enum
//! - **Typed Payloads**: pull request, push, issues, comments, releases and ping
//! - **Ordered Handlers**: handlers run in registration order, first error wins
//! - **Field Filters**: only run a handler for selected values of a top-level field
//! - **Predicate Filters**: only run a handler when a closure accepts the payload
//! - **Custom Responses**: override the dispatcher's own success/error responses
//!
//! # Example
//!
//! ```rust,no_run
//! use hookwire_core::{Dispatcher, Event, Payload, WebhookRequest, WebhookResponse, handler_fn};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dispatcher = Dispatcher::new();
//!
//!     dispatcher.on_fields(
//!         Event::PullRequest,
//!         [("action", ["opened", "reopened"])],
//!         handler_fn(|payload: &Payload| {
//!             let pr = payload.data().as_pull_request().expect("pull_request payload");
//!             Ok(WebhookResponse::ok(format!("reviewing #{}", pr.number)))
//!         }),
//!     );
//!
//!     let request = WebhookRequest::new(r#"{"zen":"Keep it logically awesome."}"#)
//!         .header("X-GitHub-Event", "ping");
//!
//!     // No handler for `ping`: answered with a 200 describing the drop
//!     let response = dispatcher.dispatch(&request).await;
//!     assert_eq!(response.status, 200);
//! }
//! ```

mod adapter;
mod config;
mod dispatcher;
mod error;
mod event;
mod filter;
mod handler;
pub mod models;
mod payload;
mod registry;
mod response;

pub use adapter::{DefaultResponseAdapter, ResponseAdapter};
pub use config::{DispatcherConfig, GITHUB_DELIVERY_HEADER, GITHUB_EVENT_HEADER};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::WebhookError;
pub use event::Event;
pub use filter::{FieldFilter, PredicateFilter};
pub use handler::{EventHandler, HandlerFn, handler_fn};
pub use payload::{EventPayload, GithubPayloadParser, Payload, PayloadParser};
pub use registry::HandlerRegistry;
pub use response::{WebhookRequest, WebhookResponse};

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
