//! Parsed webhook payloads

use crate::models::{
    IssueCommentEvent, IssuesEvent, PingEvent, PullRequestEvent, PushEvent, ReleaseEvent,
};
use crate::{Event, Result, WebhookError};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::{Map, Value};

/// Typed body of a delivery, keyed by event type
///
/// Events without a dedicated model are kept as their top-level JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    /// `pull_request`
    PullRequest(Box<PullRequestEvent>),
    /// `push`
    Push(Box<PushEvent>),
    /// `issues`
    Issues(Box<IssuesEvent>),
    /// `issue_comment`
    IssueComment(Box<IssueCommentEvent>),
    /// `release`
    Release(Box<ReleaseEvent>),
    /// `ping`
    Ping(Box<PingEvent>),
    /// Any other event, as its top-level JSON object
    Other(Map<String, Value>),
}

impl EventPayload {
    /// The payload of a `pull_request` delivery
    pub fn as_pull_request(&self) -> Option<&PullRequestEvent> {
        match self {
            Self::PullRequest(e) => Some(&**e),
            _ => None,
        }
    }

    /// The payload of a `push` delivery
    pub fn as_push(&self) -> Option<&PushEvent> {
        match self {
            Self::Push(e) => Some(&**e),
            _ => None,
        }
    }

    /// The payload of an `issues` delivery
    pub fn as_issues(&self) -> Option<&IssuesEvent> {
        match self {
            Self::Issues(e) => Some(&**e),
            _ => None,
        }
    }

    /// The payload of an `issue_comment` delivery
    pub fn as_issue_comment(&self) -> Option<&IssueCommentEvent> {
        match self {
            Self::IssueComment(e) => Some(&**e),
            _ => None,
        }
    }

    /// The payload of a `release` delivery
    pub fn as_release(&self) -> Option<&ReleaseEvent> {
        match self {
            Self::Release(e) => Some(&**e),
            _ => None,
        }
    }

    /// The payload of a `ping` delivery
    pub fn as_ping(&self) -> Option<&PingEvent> {
        match self {
            Self::Ping(e) => Some(&**e),
            _ => None,
        }
    }

    /// The `action` field, for events that carry one
    pub fn action(&self) -> Option<&str> {
        match self {
            Self::PullRequest(e) => Some(e.action.as_str()),
            Self::Issues(e) => Some(e.action.as_str()),
            Self::IssueComment(e) => Some(e.action.as_str()),
            Self::Release(e) => Some(e.action.as_str()),
            Self::Other(map) => map.get("action").and_then(Value::as_str),
            Self::Push(_) | Self::Ping(_) => None,
        }
    }
}

/// A parsed delivery handed to every handler registered for its event
#[derive(Debug)]
pub struct Payload {
    event: Event,
    delivery_id: Option<String>,
    data: EventPayload,
    fields: OnceCell<Map<String, Value>>,
}

impl Payload {
    /// Wrap a typed payload
    pub fn new(event: Event, data: EventPayload) -> Self {
        Self {
            event,
            delivery_id: None,
            data,
            fields: OnceCell::new(),
        }
    }

    /// Attach the delivery GUID sent by GitHub
    pub fn with_delivery_id(mut self, id: impl Into<String>) -> Self {
        self.delivery_id = Some(id.into());
        self
    }

    /// Event type of the delivery
    pub fn event(&self) -> Event {
        self.event
    }

    /// Delivery GUID, when the request carried one
    pub fn delivery_id(&self) -> Option<&str> {
        self.delivery_id.as_deref()
    }

    /// The typed payload
    pub fn data(&self) -> &EventPayload {
        &self.data
    }

    /// Generic top-level field view of the payload
    ///
    /// Computed on first use and shared by every later caller for this
    /// delivery.
    pub fn fields(&self) -> Result<&Map<String, Value>> {
        self.fields.get_or_try_init(|| {
            match serde_json::to_value(&self.data)
                .map_err(|e| WebhookError::Serialization(e.to_string()))?
            {
                Value::Object(map) => Ok(map),
                other => Err(WebhookError::Serialization(format!(
                    "expected a JSON object for '{}', got {}",
                    self.event, other
                ))),
            }
        })
    }

    /// Look up a single top-level field
    pub fn field(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.fields()?.get(key))
    }
}

/// Turns a raw body into a typed payload
pub trait PayloadParser: Send + Sync {
    /// Parse `body` as a delivery of `event`
    fn parse(&self, event: Event, body: &[u8]) -> Result<EventPayload>;
}

/// JSON parser for GitHub deliveries
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubPayloadParser;

impl PayloadParser for GithubPayloadParser {
    fn parse(&self, event: Event, body: &[u8]) -> Result<EventPayload> {
        let payload = match event {
            Event::PullRequest => EventPayload::PullRequest(serde_json::from_slice(body)?),
            Event::Push => EventPayload::Push(serde_json::from_slice(body)?),
            Event::Issues => EventPayload::Issues(serde_json::from_slice(body)?),
            Event::IssueComment => EventPayload::IssueComment(serde_json::from_slice(body)?),
            Event::Release => EventPayload::Release(serde_json::from_slice(body)?),
            Event::Ping => EventPayload::Ping(serde_json::from_slice(body)?),
            _ => EventPayload::Other(serde_json::from_slice(body)?),
        };
        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn pull_request_body(action: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "action": action,
            "number": 7,
            "pull_request": {
                "id": 42,
                "number": 7,
                "state": "open",
                "title": "Add dispatcher",
                "head": { "ref": "feature", "sha": "aaa" },
                "base": { "ref": "main", "sha": "bbb" },
                "mergeable": null,
            },
            "repository": {
                "id": 1,
                "name": "hookwire",
                "full_name": "octo/hookwire",
            },
            "sender": { "login": "octocat", "id": 1 },
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_pull_request() {
        let data = GithubPayloadParser
            .parse(Event::PullRequest, &pull_request_body("opened"))
            .unwrap();
        let pr = data.as_pull_request().unwrap();
        assert_eq!(pr.action, "opened");
        assert_eq!(pr.pull_request.head.ref_name, "feature");
        assert_eq!(data.action(), Some("opened"));
        assert!(data.as_push().is_none());
    }

    #[test]
    fn test_parse_unmodelled_event() {
        let body = br#"{"action":"created","starred_at":null}"#;
        let data = GithubPayloadParser.parse(Event::Watch, body).unwrap();
        assert!(matches!(data, EventPayload::Other(_)));
        assert_eq!(data.action(), Some("created"));
    }

    #[test]
    fn test_parse_failure() {
        let err = GithubPayloadParser
            .parse(Event::PullRequest, b"not json")
            .unwrap_err();
        assert!(matches!(err, WebhookError::PayloadError(_)));

        // Wrong shape for the event is also a parse failure
        let err = GithubPayloadParser
            .parse(Event::PullRequest, br#"{"ref":"refs/heads/main"}"#)
            .unwrap_err();
        assert!(matches!(err, WebhookError::PayloadError(_)));
    }

    #[test]
    fn test_fields_view() {
        let data = GithubPayloadParser
            .parse(Event::PullRequest, &pull_request_body("closed"))
            .unwrap();
        let payload = Payload::new(Event::PullRequest, data).with_delivery_id("d-1");

        assert_eq!(payload.delivery_id(), Some("d-1"));
        assert_eq!(payload.field("action").unwrap(), Some(&json!("closed")));
        assert_eq!(payload.field("number").unwrap(), Some(&json!(7)));
        assert_eq!(payload.field("missing").unwrap(), None);

        let fields = payload.fields().unwrap();
        assert_eq!(fields["pull_request"]["mergeable"], Value::Null);
    }

    #[test]
    fn test_fields_computed_once() {
        let payload = Payload::new(
            Event::Watch,
            EventPayload::Other(json!({"action": "started"}).as_object().unwrap().clone()),
        );
        let first = payload.fields().unwrap() as *const _;
        let second = payload.fields().unwrap() as *const _;
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_fields_view_matches_delivery() {
        let body = json!({
            "ref": "refs/heads/main",
            "before": "0000",
            "after": "1111",
            "head_commit": {
                "id": "1111",
                "message": "Update README",
                "timestamp": "2015-05-05T19:40:15-04:00",
            },
            "pusher": { "name": "octocat" },
        });
        let data = GithubPayloadParser
            .parse(Event::Push, &serde_json::to_vec(&body).unwrap())
            .unwrap();
        let payload = Payload::new(Event::Push, data);

        assert_eq!(
            payload.fields().unwrap(),
            body.as_object().unwrap(),
        );
        assert_eq!(payload.field("forced").unwrap(), None);
        assert_eq!(payload.field("commits").unwrap(), None);
    }
}
