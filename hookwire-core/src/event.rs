//! Known GitHub webhook event names

use crate::WebhookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! events {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// A webhook event type, as sent in the `X-GitHub-Event` header.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Event {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Event {
            /// Every known event, in declaration order
            pub const ALL: &'static [Event] = &[$(Event::$variant,)+];

            /// Get the wire name of the event
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Event::$variant => $name,)+
                }
            }
        }

        impl FromStr for Event {
            type Err = WebhookError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Event::$variant),)+
                    other => Err(WebhookError::UnknownEvent(other.to_string())),
                }
            }
        }
    };
}

events! {
    CheckRun => "check_run",
    CheckSuite => "check_suite",
    CommitComment => "commit_comment",
    Create => "create",
    Delete => "delete",
    Deployment => "deployment",
    DeploymentStatus => "deployment_status",
    Fork => "fork",
    Gollum => "gollum",
    Installation => "installation",
    /// Legacy name of `installation`, still sent by older GitHub Apps
    IntegrationInstallation => "integration_installation",
    IssueComment => "issue_comment",
    Issues => "issues",
    Label => "label",
    Member => "member",
    Membership => "membership",
    Milestone => "milestone",
    Organization => "organization",
    OrgBlock => "org_block",
    PageBuild => "page_build",
    /// Sent once when a webhook is created
    Ping => "ping",
    ProjectCard => "project_card",
    ProjectColumn => "project_column",
    Project => "project",
    Public => "public",
    PullRequest => "pull_request",
    PullRequestReview => "pull_request_review",
    PullRequestReviewComment => "pull_request_review_comment",
    Push => "push",
    Release => "release",
    Repository => "repository",
    Status => "status",
    Team => "team",
    TeamAdd => "team_add",
    Watch => "watch",
    WorkflowJob => "workflow_job",
    WorkflowRun => "workflow_run",
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
