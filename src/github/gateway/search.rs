//! Octocrab implementation of the GraphQL pull request search gateway.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;

use crate::github::credential::AccessToken;
use crate::github::error::GitHubError;
use crate::github::locator::ApiBase;
use crate::github::models::ApiPullRequest;
use crate::github::pagination::{PageCursor, PageInfo};
use crate::github::query::SearchQuery;
use crate::github::rate_limit::QuotaSnapshot;

use super::client::build_octocrab_client;
use super::error_mapping::{decode_error, map_octocrab_error};
use super::{SearchGateway, SearchPage};

/// GraphQL document issued for every search page.
///
/// Variables: `query` (search string) and `searchCursor` (null for the first
/// page).
pub const SEARCH_QUERY_DOCUMENT: &str = r"query($query: String!, $searchCursor: String) {
  rateLimit { cost remaining }
  search(type: ISSUE, first: 100, after: $searchCursor, query: $query) {
    pageInfo { hasNextPage endCursor }
    nodes {
      ... on PullRequest {
        number
        merged
        title
        author { login }
        baseRef { name prefix }
        headRefOid
        repository { name nameWithOwner owner { login } }
        labels(first: 100) { nodes { ... on Label { id name } } }
        milestone { id closed }
      }
    }
  }
}";

const OPERATION: &str = "search pull requests";
const RATE_LIMITED: &str = "RATE_LIMITED";

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<SearchData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    rate_limit: Option<ApiRateLimit>,
    search: ApiSearch,
}

#[derive(Debug, Deserialize)]
struct ApiRateLimit {
    cost: u64,
    remaining: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSearch {
    page_info: ApiPageInfo,
    #[serde(default)]
    nodes: Vec<Option<ApiPullRequest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// Octocrab-backed search gateway.
pub struct OctocrabSearchGateway {
    client: Octocrab,
}

impl OctocrabSearchGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when the base URI cannot be parsed or
    /// `GitHubError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &AccessToken, api_base: &ApiBase) -> Result<Self, GitHubError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl SearchGateway for OctocrabSearchGateway {
    async fn search_page(
        &self,
        query: &SearchQuery,
        after: Option<PageCursor>,
    ) -> Result<SearchPage, GitHubError> {
        let body = json!({
            "query": SEARCH_QUERY_DOCUMENT,
            "variables": {
                "query": query.as_str(),
                "searchCursor": after.as_ref().map(PageCursor::as_str),
            },
        });

        let raw = self
            .client
            .post::<_, serde_json::Value>("/graphql", Some(&body))
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        let envelope: GraphQlEnvelope =
            serde_json::from_value(raw).map_err(|error| decode_error(OPERATION, &error))?;

        into_search_page(envelope)
    }
}

fn into_search_page(envelope: GraphQlEnvelope) -> Result<SearchPage, GitHubError> {
    if let Some(error) = envelope.errors.first() {
        let message = format!("{OPERATION} failed: {}", error.message);
        return Err(if error.kind.as_deref() == Some(RATE_LIMITED) {
            GitHubError::RateLimitExceeded { message }
        } else {
            GitHubError::InvalidResponse { message }
        });
    }

    let data = envelope.data.ok_or_else(|| GitHubError::InvalidResponse {
        message: format!("{OPERATION} returned no data"),
    })?;

    let quota = data
        .rate_limit
        .map(|limit| QuotaSnapshot::new(limit.cost, limit.remaining))
        .unwrap_or_default();

    let pull_requests = data
        .search
        .nodes
        .into_iter()
        .flatten()
        .filter_map(ApiPullRequest::into_pull_request)
        .collect();

    let page_info = PageInfo::new(
        data.search.page_info.has_next_page,
        data.search.page_info.end_cursor.and_then(PageCursor::new),
    );

    Ok(SearchPage {
        pull_requests,
        page_info,
        quota,
    })
}
