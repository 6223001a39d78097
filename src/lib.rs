//! Pull request status dashboard backend.
//!
//! The library bridges a browser session to GitHub's search API: it
//! validates the access token kept in the session, invalidates the session
//! when GitHub rejects the token, builds a repository-scoped search query,
//! and drains every page of results into the JSON payload served at
//! `/pr-status`.

pub mod config;
pub mod dashboard;
pub mod github;
pub mod session;
pub mod telemetry;

pub use config::{DashboardSettings, PrStatusConfig};
pub use dashboard::{DashboardAgent, DashboardError, StatusParams, UserData};
pub use github::{
    AccessToken, ApiBase, Credential, GatewayFactory, GitHubError, OctocrabGatewayFactory,
    PullRequest, RepositoryScope, SearchQuery,
};
pub use session::{MemorySessionStore, SessionStore, SignedCookieSessionStore};
