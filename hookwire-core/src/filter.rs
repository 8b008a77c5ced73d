//! Filtering wrappers around handlers
//!
//! A filter that rejects a delivery answers with a 200 and a short body
//! describing the drop. Dropping is not a failure, so later handlers for the
//! same event still run.

use crate::{EventHandler, Payload, Result, WebhookResponse};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Only invokes the inner handler when top-level fields hold allowed values
///
/// ```rust,ignore
/// // only 'opened' and 'reopened' pull requests reach the handler
/// let filtered = FieldFilter::new(handler).allow("action", ["opened", "reopened"]);
/// ```
pub struct FieldFilter<H> {
    fields: BTreeMap<String, BTreeSet<String>>,
    inner: H,
}

impl<H: EventHandler> FieldFilter<H> {
    /// Wrap a handler with an empty filter, which accepts every delivery
    pub fn new(inner: H) -> Self {
        Self {
            fields: BTreeMap::new(),
            inner,
        }
    }

    /// Wrap a handler with a prepared field map
    pub fn with_fields<K, V, I>(inner: H, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        fields
            .into_iter()
            .fold(Self::new(inner), |filter, (key, values)| filter.allow(key, values))
    }

    /// Allow `values` for the top-level `field`
    ///
    /// Calling this again for the same field extends its allowed set.
    pub fn allow<I>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.fields
            .entry(field.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// The configured field map
    pub fn fields(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.fields
    }

    /// Check the payload fields, returning the drop message on rejection
    fn check(&self, payload: &Map<String, Value>) -> Option<String> {
        for (key, allowed) in &self.fields {
            let Some(value) = payload.get(key) else {
                return Some(format!("No key:'{}' in event body", key));
            };

            let matched = value.as_str().is_some_and(|v| allowed.contains(v));
            if !matched {
                let shown = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                return Some(format!(
                    "Dropping unregistered value: '{}' for key '{}'",
                    shown, key
                ));
            }
        }
        None
    }
}

#[async_trait]
impl<H: EventHandler> EventHandler for FieldFilter<H> {
    async fn handle(&self, payload: &Payload) -> Result<WebhookResponse> {
        let fields = payload.fields()?;

        if let Some(message) = self.check(fields) {
            debug!(event = %payload.event(), "{}", message);
            return Ok(WebhookResponse::ok(message));
        }

        self.inner.handle(payload).await
    }
}

/// Only invokes the inner handler when a predicate accepts the payload fields
pub struct PredicateFilter<P, H> {
    predicate: P,
    inner: H,
}

impl<P, H> PredicateFilter<P, H>
where
    P: Fn(&Map<String, Value>) -> bool + Send + Sync,
    H: EventHandler,
{
    /// Wrap `inner` behind `predicate`
    pub fn new(predicate: P, inner: H) -> Self {
        Self { predicate, inner }
    }
}

#[async_trait]
impl<P, H> EventHandler for PredicateFilter<P, H>
where
    P: Fn(&Map<String, Value>) -> bool + Send + Sync,
    H: EventHandler,
{
    async fn handle(&self, payload: &Payload) -> Result<WebhookResponse> {
        let fields = payload.fields()?;

        if !(self.predicate)(fields) {
            debug!(event = %payload.event(), "predicate rejected delivery");
            return Ok(WebhookResponse::ok("Dropping unmatched event for function"));
        }

        self.inner.handle(payload).await
    }
}
