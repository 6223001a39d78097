//! Test helpers for constructing pull request fixtures.
//!
//! Provides builders for domain [`PullRequest`] values and for the GraphQL
//! JSON payloads a search endpoint returns, so unit and integration tests
//! share one description of the wire format.

use serde_json::{Value, json};

use super::{Author, PullRequest, Repository, RepositoryOwner};

/// Constructs a minimal `PullRequest` with only number, title, and
/// repository set.
#[must_use]
pub fn minimal_pull_request(number: u64, name_with_owner: &str) -> PullRequest {
    let (owner, name) = name_with_owner
        .split_once('/')
        .unwrap_or(("", name_with_owner));
    PullRequest {
        number,
        title: format!("Pull request {number}"),
        author: Author {
            login: "octocat".to_owned(),
        },
        repository: Repository {
            name: name.to_owned(),
            name_with_owner: name_with_owner.to_owned(),
            owner: RepositoryOwner {
                login: owner.to_owned(),
            },
        },
        ..PullRequest::default()
    }
}

/// GraphQL search node for a pull request authored by `octocat`.
#[must_use]
pub fn pull_request_node(number: u64, name_with_owner: &str) -> Value {
    let (owner, name) = name_with_owner
        .split_once('/')
        .unwrap_or(("", name_with_owner));
    json!({
        "number": number,
        "merged": false,
        "title": format!("Pull request {number}"),
        "author": { "login": "octocat" },
        "baseRef": { "name": "main", "prefix": "refs/heads/" },
        "headRefOid": format!("{number:040x}"),
        "repository": {
            "name": name,
            "nameWithOwner": name_with_owner,
            "owner": { "login": owner }
        },
        "labels": { "nodes": [{ "id": format!("label-{number}"), "name": "lgtm" }] },
        "milestone": null
    })
}

/// Complete GraphQL search response body for one page.
///
/// `numbers` become pull request nodes in `name_with_owner`; `end_cursor`
/// is reported verbatim and `has_next_page` controls pagination.
#[must_use]
pub fn search_page_body(
    numbers: &[u64],
    name_with_owner: &str,
    has_next_page: bool,
    end_cursor: Option<&str>,
    quota: (u64, u64),
) -> Value {
    let nodes: Vec<Value> = numbers
        .iter()
        .map(|number| pull_request_node(*number, name_with_owner))
        .collect();
    let (cost, remaining) = quota;
    json!({
        "data": {
            "rateLimit": { "cost": cost, "remaining": remaining },
            "search": {
                "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor },
                "nodes": nodes
            }
        }
    })
}
