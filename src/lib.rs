// Hookwire - GitHub webhook dispatch for Rust
//
// This library routes webhook deliveries to handlers registered per event
// type, with field and predicate filters and an AWS Lambda adapter.

// Re-export core functionality
pub use hookwire_core::*;

// Re-export optional crates
#[cfg(feature = "lambda")]
pub use hookwire_lambda;

/// Prelude for common imports.
///
/// ```
/// use hookwire::prelude::*;
/// ```
pub mod prelude {
    pub use hookwire_core::{
        Dispatcher, Event, EventHandler, EventPayload, FieldFilter, Payload, PredicateFilter,
        ResponseAdapter, WebhookError, WebhookRequest, WebhookResponse, handler_fn,
    };

    #[cfg(feature = "lambda")]
    pub use hookwire_lambda::{LambdaConfig, LambdaRuntime, init_tracing};
}
