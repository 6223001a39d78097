//! Data models representing open pull requests found by search.
//!
//! Types prefixed with `Api` are internal deserialisation targets for the
//! GraphQL payload (camelCase) that convert into the public domain types.
//! The public types serialise with the field names the dashboard frontend
//! reads (`Number`, `Title`, `HeadRefOID`, ...).

use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Login of a GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Login(String);

impl Login {
    /// Wraps a login, returning `None` when it is blank.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let login = value.into();
        if login.trim().is_empty() {
            None
        } else {
            Some(Self(login))
        }
    }

    /// Borrow the login value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Login {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Login {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Author of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Author {
    /// Login of the author; empty for deleted ("ghost") accounts.
    pub login: String,
}

/// Branch the pull request targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseRef {
    /// Branch name, e.g. `main`.
    pub name: String,
    /// Ref prefix, e.g. `refs/heads/`.
    pub prefix: String,
}

/// Owner of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryOwner {
    /// Owner login.
    pub login: String,
}

/// Repository a pull request belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Repository {
    /// Short repository name.
    pub name: String,
    /// `owner/name` form.
    pub name_with_owner: String,
    /// Owning account.
    pub owner: RepositoryOwner,
}

/// Label attached to a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Label {
    /// GraphQL node id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Label name.
    pub name: String,
}

/// Milestone a pull request is scheduled for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Milestone {
    /// GraphQL node id.
    #[serde(rename = "ID")]
    pub id: String,
    /// Whether the milestone is closed.
    pub closed: bool,
}

/// Read-only projection of an open pull request returned by search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Whether the pull request has been merged.
    pub merged: bool,
    /// Title of the pull request.
    pub title: String,
    /// Author of the pull request.
    pub author: Author,
    /// Target branch.
    pub base_ref: BaseRef,
    /// Commit id of the head branch tip.
    #[serde(rename = "HeadRefOID")]
    pub head_ref_oid: String,
    /// Repository the pull request belongs to.
    pub repository: Repository,
    /// Labels, at most 100 per pull request.
    pub labels: Vec<Label>,
    /// Milestone, if one is set.
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiUser {
    pub(crate) login: String,
}

/// Search result node. Nodes that are not pull requests deserialise with
/// every field absent and are skipped during conversion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: Option<u64>,
    pub(crate) merged: bool,
    pub(crate) title: String,
    pub(crate) author: Option<ApiActor>,
    pub(crate) base_ref: Option<ApiBaseRef>,
    pub(crate) head_ref_oid: String,
    pub(crate) repository: Option<ApiRepository>,
    pub(crate) labels: Option<ApiLabelConnection>,
    pub(crate) milestone: Option<ApiMilestone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiActor {
    pub(crate) login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiBaseRef {
    pub(crate) name: String,
    pub(crate) prefix: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) name_with_owner: String,
    pub(crate) owner: Option<ApiActor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiLabelConnection {
    pub(crate) nodes: Vec<Option<ApiLabel>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiLabel {
    pub(crate) id: String,
    pub(crate) name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiMilestone {
    pub(crate) id: String,
    pub(crate) closed: bool,
}

impl ApiPullRequest {
    /// Converts the node into a pull request, or `None` for non-PR nodes.
    pub(crate) fn into_pull_request(self) -> Option<PullRequest> {
        let number = self.number?;
        Some(PullRequest {
            number,
            merged: self.merged,
            title: self.title,
            author: Author {
                login: self.author.map(|actor| actor.login).unwrap_or_default(),
            },
            base_ref: self
                .base_ref
                .map(|base| BaseRef {
                    name: base.name,
                    prefix: base.prefix,
                })
                .unwrap_or_default(),
            head_ref_oid: self.head_ref_oid,
            repository: self.repository.map(Repository::from).unwrap_or_default(),
            labels: self
                .labels
                .map(|connection| {
                    connection
                        .nodes
                        .into_iter()
                        .flatten()
                        .map(|label| Label {
                            id: label.id,
                            name: label.name,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            milestone: self.milestone.map(|milestone| Milestone {
                id: milestone.id,
                closed: milestone.closed,
            }),
        })
    }
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        Self {
            name: value.name,
            name_with_owner: value.name_with_owner,
            owner: RepositoryOwner {
                login: value.owner.map(|owner| owner.login).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiPullRequest, Login, PullRequest};

    fn decode(value: serde_json::Value) -> Option<PullRequest> {
        serde_json::from_value::<ApiPullRequest>(value)
            .expect("node should deserialise")
            .into_pull_request()
    }

    #[test]
    fn converts_full_graphql_node() {
        let pull_request = decode(json!({
            "number": 42,
            "merged": false,
            "title": "Fix flake",
            "author": { "login": "octocat" },
            "baseRef": { "name": "main", "prefix": "refs/heads/" },
            "headRefOid": "deadbeef",
            "repository": {
                "name": "test-infra",
                "nameWithOwner": "kubernetes/test-infra",
                "owner": { "login": "kubernetes" }
            },
            "labels": { "nodes": [{ "id": "L1", "name": "lgtm" }, null] },
            "milestone": { "id": "M1", "closed": true }
        }))
        .expect("node should be a pull request");

        assert_eq!(pull_request.number, 42);
        assert_eq!(pull_request.author.login, "octocat");
        assert_eq!(pull_request.base_ref.name, "main");
        assert_eq!(pull_request.repository.name_with_owner, "kubernetes/test-infra");
        assert_eq!(pull_request.repository.owner.login, "kubernetes");
        assert_eq!(pull_request.labels.len(), 1, "null label nodes are dropped");
        assert_eq!(
            pull_request.milestone.map(|milestone| milestone.closed),
            Some(true)
        );
    }

    #[test]
    fn skips_non_pull_request_nodes() {
        assert!(decode(json!({})).is_none());
    }

    #[test]
    fn tolerates_deleted_author_and_missing_milestone() {
        let pull_request = decode(json!({
            "number": 7,
            "title": "Orphaned",
            "author": null,
            "milestone": null
        }))
        .expect("node should be a pull request");

        assert_eq!(pull_request.author.login, "");
        assert!(pull_request.milestone.is_none());
        assert!(pull_request.labels.is_empty());
    }

    #[test]
    fn serialises_with_frontend_field_names() {
        let value = serde_json::to_value(PullRequest {
            number: 1,
            head_ref_oid: "abc".to_owned(),
            ..PullRequest::default()
        })
        .expect("pull request should serialise");

        assert_eq!(value.get("Number"), Some(&json!(1)));
        assert_eq!(value.get("HeadRefOID"), Some(&json!("abc")));
        assert!(value.get("BaseRef").is_some());
        assert_eq!(value.get("Milestone"), Some(&json!(null)));
    }

    #[test]
    fn login_rejects_blank_values() {
        assert!(Login::new("  ").is_none());
        assert_eq!(Login::new("octocat").map(|login| login.to_string()), Some("octocat".to_owned()));
    }
}
