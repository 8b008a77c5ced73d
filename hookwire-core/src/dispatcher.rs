//! Webhook dispatcher

use crate::{
    DefaultResponseAdapter, DispatcherConfig, Event, EventHandler, FieldFilter,
    GithubPayloadParser, HandlerRegistry, Payload, PayloadParser, PredicateFilter,
    ResponseAdapter, Result, WebhookError, WebhookRequest, WebhookResponse, handler_fn,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info_span, warn};

/// Routes webhook deliveries to the handlers registered for their event
///
/// Handlers for one event run one after another, in registration order, all
/// seeing the same parsed payload. The first failure stops the run and becomes
/// the response. When every handler succeeds, the response of the last one is
/// returned and earlier responses are discarded.
///
/// Register everything before serving traffic. The dispatcher is cheap to
/// clone; clones share the same registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: HandlerRegistry,
    parser: Arc<dyn PayloadParser>,
    adapter: Arc<dyn ResponseAdapter>,
    config: Arc<DispatcherConfig>,
}

impl Dispatcher {
    /// Create a dispatcher with the GitHub parser and default responses
    pub fn new() -> Self {
        DispatcherBuilder::new().build()
    }

    /// Create a dispatcher with custom config
    pub fn with_config(config: DispatcherConfig) -> Self {
        DispatcherBuilder::new().config(config).build()
    }

    /// Create a builder for custom parser, responses and config
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Registered handlers, shared with every clone
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Append a handler for `event`
    pub fn on<H>(&self, event: Event, handler: H) -> &Self
    where
        H: EventHandler + 'static,
    {
        self.registry.register(event, Arc::new(handler));

        if self.config.enable_logging {
            debug!(
                event = %event,
                handlers = self.registry.handler_count(event),
                "Registered handler"
            );
        }
        self
    }

    /// Append a closure handler for `event`
    pub fn on_fn<F>(&self, event: Event, f: F) -> &Self
    where
        F: Fn(&Payload) -> Result<WebhookResponse> + Send + Sync + 'static,
    {
        self.on(event, handler_fn(f))
    }

    /// Append a handler that only runs when top-level fields hold allowed values
    ///
    /// ```rust,ignore
    /// dispatcher.on_fields(
    ///     Event::PullRequest,
    ///     [("action", ["opened"])],
    ///     handler_fn(|_: &Payload| Ok(WebhookResponse::ok("new pull request"))),
    /// );
    /// ```
    pub fn on_fields<K, V, I, H>(&self, event: Event, fields: I, handler: H) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
        H: EventHandler + 'static,
    {
        self.on(event, FieldFilter::with_fields(handler, fields))
    }

    /// Append a handler that only runs when `predicate` accepts the payload fields
    pub fn on_predicate<P, H>(&self, event: Event, predicate: P, handler: H) -> &Self
    where
        P: Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
        H: EventHandler + 'static,
    {
        self.on(event, PredicateFilter::new(predicate, handler))
    }

    /// Number of handlers registered for `event`
    pub fn handler_count(&self, event: Event) -> usize {
        self.registry.handler_count(event)
    }

    /// Remove every registered handler
    pub fn clear(&self) {
        self.registry.clear();
    }

    /// Dispatch a delivery, turning any failure into an error response
    pub async fn dispatch(&self, request: &WebhookRequest) -> WebhookResponse {
        match self.try_dispatch(request).await {
            Ok(response) => response,
            Err(err) => {
                error!("Webhook dispatch failed: {}", err);
                self.adapter.error(&err)
            }
        }
    }

    /// Dispatch a delivery, returning failures unconverted
    ///
    /// Deliveries for events without handlers are not failures: they yield
    /// the success response of the configured adapter.
    pub async fn try_dispatch(&self, request: &WebhookRequest) -> Result<WebhookResponse> {
        let name = request
            .header_value(&self.config.event_header)
            .ok_or_else(|| WebhookError::MissingHeader(self.config.event_header.clone()))?;
        let delivery = request.header_value(&self.config.delivery_header);

        let span = info_span!("webhook", event = %name, delivery = delivery.unwrap_or("-"));
        self.run(name, delivery, &request.body).instrument(span).await
    }

    async fn run(&self, name: &str, delivery: Option<&str>, body: &[u8]) -> Result<WebhookResponse> {
        let registered = name
            .parse::<Event>()
            .ok()
            .and_then(|event| self.registry.get(event).map(|handlers| (event, handlers)));

        let Some((event, handlers)) = registered else {
            if self.config.enable_logging {
                warn!("No handlers registered for event: {}", name);
            }
            return Ok(self
                .adapter
                .success(&format!("Dropping unregistered event: '{}'", name)));
        };

        let data = self.parser.parse(event, body)?;
        let mut payload = Payload::new(event, data);
        if let Some(id) = delivery {
            payload = payload.with_delivery_id(id);
        }

        let mut last = None;
        for (index, handler) in handlers.iter().enumerate() {
            if self.config.enable_logging {
                debug!(handler = index, "Invoking handler");
            }

            let response = handler.handle(&payload).await.inspect_err(|e| {
                error!(handler = index, "Handler failed: {}", e);
            })?;
            last = Some(response);
        }

        Ok(last.unwrap_or_else(|| {
            self.adapter
                .success(&format!("No handler produced a response for '{}'", name))
        }))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Dispatcher builder
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    parser: Arc<dyn PayloadParser>,
    adapter: Arc<dyn ResponseAdapter>,
}

impl DispatcherBuilder {
    /// Create new dispatcher builder
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            parser: Arc::new(GithubPayloadParser),
            adapter: Arc::new(DefaultResponseAdapter),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the header carrying the event name
    pub fn event_header(mut self, header: impl Into<String>) -> Self {
        self.config.event_header = header.into();
        self
    }

    /// Enable/disable logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.config.enable_logging = enabled;
        self
    }

    /// Use a custom payload parser
    pub fn parser(mut self, parser: impl PayloadParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Use custom success/error responses
    pub fn response_adapter(mut self, adapter: impl ResponseAdapter + 'static) -> Self {
        self.adapter = Arc::new(adapter);
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: HandlerRegistry::new(),
            parser: self.parser,
            adapter: self.adapter,
            config: Arc::new(self.config),
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
