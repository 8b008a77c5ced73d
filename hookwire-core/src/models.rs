//! Typed GitHub webhook payloads
//!
//! Only the fields most handlers reach for are modelled. Everything else is
//! kept in the `extra` map of each type. Optional fields that were absent stay
//! absent and timestamps keep their original text, so serializing a parsed
//! payload gives back exactly the keys and values GitHub sent.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// RFC 3339 timestamp that serializes back to the text it was parsed from
///
/// GitHub mixes `Z` and numeric offsets (`-04:00`) between fields; the
/// original text is what filters and predicates compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    at: DateTime<FixedOffset>,
}

impl Timestamp {
    /// Parse an RFC 3339 timestamp
    pub fn parse(raw: impl Into<String>) -> Result<Self, chrono::ParseError> {
        let raw = raw.into();
        let at = DateTime::parse_from_rfc3339(&raw)?;
        Ok(Self { raw, at })
    }

    /// The timestamp exactly as delivered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The instant with the offset GitHub sent
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.at
    }

    /// The instant in UTC
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.at.with_timezone(&Utc)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// A GitHub account (user, bot or organization)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account login name
    pub login: String,

    /// Numeric account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// "User", "Bot" or "Organization"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Repository the event happened in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric repository id
    pub id: u64,
    /// Short name
    pub name: String,
    /// `owner/name`
    pub full_name: String,

    /// Whether the repository is private
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,

    /// Owning account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,

    /// Web URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,

    /// Default branch name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Repository {
    /// Private repository; unknown counts as public
    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(false)
    }
}

/// Head or base of a pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// Commit the ref points at
    pub sha: String,

    /// `owner:branch`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pull request as embedded in `pull_request` deliveries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Global pull request id
    pub id: u64,
    /// Number within the repository
    pub number: u64,
    /// `open` or `closed`
    pub state: String,
    /// Title
    pub title: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Web URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,

    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// Whether the pull request is a draft
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,

    /// Whether the pull request was merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged: Option<bool>,

    /// Source branch
    pub head: PullRequestRef,
    /// Target branch
    pub base: PullRequestRef,

    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Last update time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    /// Merge time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<Timestamp>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Issue as embedded in `issues` and `issue_comment` deliveries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Global issue id
    pub id: u64,
    /// Number within the repository
    pub number: u64,
    /// `open` or `closed`
    pub state: String,
    /// Title
    pub title: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Web URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,

    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Comment on an issue or pull request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id
    pub id: u64,
    /// Markdown body
    pub body: String,

    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// Web URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,

    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Release as embedded in `release` deliveries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    /// Release id
    pub id: u64,
    /// Tag the release points at
    pub tag_name: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unpublished draft
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,

    /// Marked as a pre-release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,

    /// Publication time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Release {
    /// Draft release; unknown counts as published
    pub fn is_draft(&self) -> bool {
        self.draft.unwrap_or(false)
    }

    /// Pre-release; unknown counts as a full release
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.unwrap_or(false)
    }
}

/// Git identity attached to a pushed commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    /// Git author name
    pub name: String,

    /// Git author email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// GitHub login, when the email maps to an account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Commit listed in a push event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA
    pub id: String,
    /// Commit message
    pub message: String,

    /// Author time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    /// Author identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<CommitAuthor>,

    /// Paths added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<Vec<String>>,

    /// Paths removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<Vec<String>>,

    /// Paths modified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<Vec<String>>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Commit {
    /// Every path the commit touched, added first, then removed, then modified
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        [&self.added, &self.removed, &self.modified]
            .into_iter()
            .flatten()
            .flatten()
            .map(String::as_str)
    }
}

/// `pull_request` delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// `opened`, `closed`, `synchronize`, ...
    pub action: String,
    /// Pull request number
    pub number: u64,
    /// The pull request itself
    pub pull_request: PullRequest,

    /// Repository of the pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    /// Account that triggered the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `push` delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    /// Full ref, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub ref_name: String,
    /// SHA before the push
    pub before: String,
    /// SHA after the push
    pub after: String,

    /// The push created the ref
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,

    /// The push deleted the ref
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,

    /// The push was a force push
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced: Option<bool>,

    /// Pushed commits, oldest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commits: Option<Vec<Commit>>,

    /// Most recent commit after the push
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_commit: Option<Commit>,

    /// Repository pushed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    /// Account that pushed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PushEvent {
    /// Branch name if the push targeted `refs/heads/*`
    pub fn branch(&self) -> Option<&str> {
        self.ref_name.strip_prefix("refs/heads/")
    }

    /// Tag name if the push targeted `refs/tags/*`
    pub fn tag(&self) -> Option<&str> {
        self.ref_name.strip_prefix("refs/tags/")
    }

    /// Pushed commits; empty when the delivery listed none
    pub fn commits(&self) -> &[Commit] {
        self.commits.as_deref().unwrap_or_default()
    }

    /// The push created the ref; unknown counts as no
    pub fn is_created(&self) -> bool {
        self.created.unwrap_or(false)
    }

    /// The push deleted the ref; unknown counts as no
    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }

    /// Force push; unknown counts as no
    pub fn is_forced(&self) -> bool {
        self.forced.unwrap_or(false)
    }
}

/// `issues` delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuesEvent {
    /// `opened`, `closed`, `labeled`, ...
    pub action: String,
    /// The issue itself
    pub issue: Issue,

    /// Repository of the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    /// Account that triggered the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `issue_comment` delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    /// `created`, `edited` or `deleted`
    pub action: String,
    /// Issue or pull request commented on
    pub issue: Issue,
    /// The comment itself
    pub comment: Comment,

    /// Repository of the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    /// Account that triggered the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `release` delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    /// `published`, `created`, `edited`, ...
    pub action: String,
    /// The release itself
    pub release: Release,

    /// Repository of the release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    /// Account that triggered the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `ping` delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingEvent {
    /// Random GitHub aphorism
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zen: Option<String>,

    /// Id of the webhook being pinged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_id: Option<u64>,

    /// Repository the hook belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,

    /// Account that created the hook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,

    /// Unmodelled keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_branch_and_tag() {
        let push: PushEvent = serde_json::from_value(json!({
            "ref": "refs/heads/main",
            "before": "0000",
            "after": "1111",
        }))
        .unwrap();
        assert_eq!(push.branch(), Some("main"));
        assert_eq!(push.tag(), None);
        assert!(push.commits().is_empty());
        assert!(!push.is_forced());
    }

    #[test]
    fn test_absent_flags_stay_absent() {
        let value = json!({
            "ref": "refs/tags/v1",
            "before": "0000",
            "after": "1111",
        });
        let push: PushEvent = serde_json::from_value(value.clone()).unwrap();
        assert!(push.forced.is_none());
        assert!(push.commits.is_none());
        assert_eq!(serde_json::to_value(&push).unwrap(), value);
    }

    #[test]
    fn test_present_flags_round_trip() {
        let value = json!({
            "ref": "refs/heads/main",
            "before": "0000",
            "after": "1111",
            "created": false,
            "forced": true,
            "commits": [],
        });
        let push: PushEvent = serde_json::from_value(value.clone()).unwrap();
        assert!(push.is_forced());
        assert!(!push.is_created());
        assert_eq!(serde_json::to_value(&push).unwrap(), value);
    }

    #[test]
    fn test_unmodelled_keys_are_kept() {
        let value = json!({
            "login": "octocat",
            "id": 1,
            "type": "User",
            "site_admin": false,
        });
        let user: User = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(user.kind.as_deref(), Some("User"));
        assert_eq!(user.extra.get("site_admin"), Some(&json!(false)));
        assert_eq!(serde_json::to_value(&user).unwrap(), value);
    }

    #[test]
    fn test_commit_timestamp_keeps_offset() {
        let value = json!({
            "id": "abc",
            "message": "fix",
            "timestamp": "2015-05-05T19:40:15-04:00",
            "added": ["README.md"],
            "modified": ["src/lib.rs"],
        });
        let commit: Commit = serde_json::from_value(value.clone()).unwrap();
        let ts = commit.timestamp.as_ref().unwrap();

        assert_eq!(ts.as_str(), "2015-05-05T19:40:15-04:00");
        assert_eq!(ts.datetime().offset().local_minus_utc(), -4 * 3600);
        assert_eq!(ts.to_utc().to_rfc3339(), "2015-05-05T23:40:15+00:00");
        assert_eq!(commit.paths().collect::<Vec<_>>(), ["README.md", "src/lib.rs"]);
        assert_eq!(serde_json::to_value(&commit).unwrap(), value);
    }

    #[test]
    fn test_utc_timestamp_keeps_zulu_suffix() {
        let ts: Timestamp = serde_json::from_value(json!("2011-01-26T19:01:12Z")).unwrap();
        assert_eq!(ts.to_string(), "2011-01-26T19:01:12Z");
        assert_eq!(serde_json::to_value(&ts).unwrap(), json!("2011-01-26T19:01:12Z"));
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        let err = serde_json::from_value::<Timestamp>(json!("yesterday"));
        assert!(err.is_err());
    }
}
