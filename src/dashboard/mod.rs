//! The `/pr-status` endpoint.
//!
//! [`DashboardAgent::handle`] runs the whole request flow: session lookup,
//! identity reconciliation, query construction, pagination. The axum handler
//! returned by [`DashboardAgent::router`] renders the result and applies the
//! cookies the flow produced. Nothing is written to the response until the
//! flow has succeeded.

pub mod error;
pub mod response;

use std::sync::Arc;

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;
use url::form_urlencoded;

use crate::github::gateway::GatewayFactory;
use crate::github::models::Login;
use crate::github::paginator::SearchPaginator;
use crate::github::query::{RepositoryScope, SearchQuery};
use crate::session::{ResponseCookies, SessionOutcome, SessionReconciler, SessionStore};
use crate::telemetry::TelemetrySink;

pub use error::DashboardError;
pub use response::{RenderedBody, UserData, render};

/// Path the dashboard is served on.
pub const PR_STATUS_PATH: &str = "/pr-status";

/// Query-string parameters accepted by `GET /pr-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusParams {
    /// Search string replacing the default author query.
    pub query: Option<String>,
    /// Wrap the body as `var <name> = <json>;`.
    pub var: Option<String>,
}

impl StatusParams {
    /// Parses a raw query string. The first occurrence of each parameter
    /// wins; unknown parameters are ignored.
    #[must_use]
    pub fn from_query_string(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "var" => &mut params.var,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// Outcome of a successfully handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    /// Payload to render.
    pub data: UserData,
    /// Cookies to set on the response.
    pub cookies: ResponseCookies,
}

/// Dashboard backend shared by every request.
#[derive(Clone)]
pub struct DashboardAgent {
    scope: Arc<RepositoryScope>,
    store: Arc<dyn SessionStore>,
    reconciler: SessionReconciler,
    paginator: SearchPaginator,
}

impl DashboardAgent {
    /// Creates an agent.
    #[must_use]
    pub fn new(
        scope: RepositoryScope,
        store: Arc<dyn SessionStore>,
        gateways: Arc<dyn GatewayFactory>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            scope: Arc::new(scope),
            reconciler: SessionReconciler::new(Arc::clone(&store), gateways),
            store,
            paginator: SearchPaginator::new(telemetry),
        }
    }

    /// Query that will be searched for `login`, honouring an override.
    ///
    /// A blank override is ignored. The configured scope is appended to an
    /// override only when it names no `org:` or `repo:` token.
    #[must_use]
    pub fn effective_query(
        &self,
        login: &Login,
        override_query: Option<&str>,
    ) -> SearchQuery {
        match override_query.filter(|query| !query.trim().is_empty()) {
            Some(query) => SearchQuery::new(query).scoped_to(&self.scope),
            None => SearchQuery::for_author(login, &self.scope),
        }
    }

    /// Handle one request as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError` when the session cannot be loaded or saved,
    /// the identity check fails transiently, or the search fails.
    pub async fn handle(
        &self,
        headers: &HeaderMap,
        params: &StatusParams,
        now: DateTime<Utc>,
    ) -> Result<DashboardResponse, DashboardError> {
        let mut session = self
            .store
            .load(headers)
            .map_err(|source| DashboardError::SessionStore {
                action: "getting session",
                source,
            })?;
        let mut cookies = ResponseCookies::default();

        let outcome = self
            .reconciler
            .reconcile(&mut session, &mut cookies, now)
            .await
            .map_err(DashboardError::from_reconcile)?;

        let data = match outcome {
            SessionOutcome::LoggedOut => UserData::logged_out(),
            SessionOutcome::LoggedIn { login, search } => {
                let query = self.effective_query(&login, params.query.as_deref());
                tracing::debug!(%login, %query, "searching pull requests");
                let pull_requests = self
                    .paginator
                    .collect(search.as_ref(), &query)
                    .await
                    .map_err(|source| DashboardError::Remote {
                        action: "querying user data",
                        source,
                    })?;
                UserData::logged_in(pull_requests)
            }
        };

        Ok(DashboardResponse { data, cookies })
    }

    /// Router serving [`PR_STATUS_PATH`] with request tracing.
    #[must_use]
    pub fn router(self) -> Router {
        Router::new()
            .route(PR_STATUS_PATH, get(pr_status))
            .layer(TraceLayer::new_for_http())
            .with_state(self)
    }
}

async fn pr_status(
    State(agent): State<DashboardAgent>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, DashboardError> {
    let params = StatusParams::from_query_string(raw_query.as_deref());
    let handled = agent.handle(&headers, &params, Utc::now()).await?;
    let rendered = render(&handled.data, params.var.as_deref())?;

    let mut response = ([(CONTENT_TYPE, rendered.content_type)], rendered.body).into_response();
    handled.cookies.apply(response.headers_mut());
    Ok(response)
}

#[cfg(test)]
mod tests;
