//! Gateways for searching pull requests and resolving identities through
//! Octocrab.
//!
//! The traits are the seams the dashboard depends on; the Octocrab
//! implementations issue the real HTTP requests and are constructed per
//! request by a [`GatewayFactory`] because each viewer brings their own
//! token.

mod client;
mod error_mapping;
mod factory;
mod search;
mod user;

pub use factory::OctocrabGatewayFactory;
pub use search::{OctocrabSearchGateway, SEARCH_QUERY_DOCUMENT};
pub use user::OctocrabUserGateway;

use async_trait::async_trait;

use crate::github::credential::AccessToken;
use crate::github::error::GitHubError;
use crate::github::models::{Login, PullRequest};
use crate::github::pagination::{PageCursor, PageInfo};
use crate::github::query::SearchQuery;
use crate::github::rate_limit::QuotaSnapshot;

/// One page of search results with its continuation and cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Pull requests on this page, in server order.
    pub pull_requests: Vec<PullRequest>,
    /// Continuation state.
    pub page_info: PageInfo,
    /// Quota reported alongside the page.
    pub quota: QuotaSnapshot,
}

/// Gateway that runs one page of a pull request search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Fetch the page following `after`, or the first page when `None`.
    async fn search_page(
        &self,
        query: &SearchQuery,
        after: Option<PageCursor>,
    ) -> Result<SearchPage, GitHubError>;
}

/// Gateway that resolves the account owning the current token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Fetch the login of the authenticated user.
    async fn current_user(&self) -> Result<Login, GitHubError>;
}

/// Gateways bound to a single access token.
pub struct Gateways {
    /// Identity lookups.
    pub user: Box<dyn UserGateway>,
    /// Pull request search.
    pub search: Box<dyn SearchGateway>,
}

/// Creates token-bound gateways.
#[cfg_attr(test, mockall::automock)]
pub trait GatewayFactory: Send + Sync {
    /// Build gateways that authenticate with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error when a client cannot be constructed.
    fn connect(&self, token: &AccessToken) -> Result<Gateways, GitHubError>;
}
