//! GitHub access: token validation and open pull request search.
//!
//! This module wraps Octocrab to resolve the login behind an access token,
//! build scoped search queries, and walk every page of a GraphQL search.
//! Errors are mapped into [`GitHubError`] variants so that callers can tell a
//! rejected credential apart from a transient failure without inspecting
//! Octocrab internals.

pub mod credential;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod paginator;
pub mod query;
pub mod rate_limit;

pub use credential::{AccessToken, Credential};
pub use error::GitHubError;
pub use gateway::{
    GatewayFactory, Gateways, OctocrabGatewayFactory, OctocrabSearchGateway, OctocrabUserGateway,
    SearchGateway, SearchPage, UserGateway,
};
pub use identity::{IdentityOutcome, validate_identity};
pub use locator::{ApiBase, GITHUB_API_BASE};
pub use models::{Login, PullRequest};
pub use paginator::SearchPaginator;
pub use query::{RepositoryScope, SearchQuery};
pub use rate_limit::{QuotaSnapshot, QuotaUsage};

#[cfg(test)]
pub use gateway::{MockGatewayFactory, MockSearchGateway, MockUserGateway};
