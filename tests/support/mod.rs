//! Shared test utilities for the `/pr-status` endpoint suites.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use pr_status::github::models::test_support::search_page_body;
use pr_status::telemetry::TelemetrySink;
use pr_status::{
    AccessToken, ApiBase, Credential, DashboardAgent, MemorySessionStore, OctocrabGatewayFactory,
    RepositoryScope, SessionStore,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

/// Repository scope used by every suite.
pub fn scope() -> RepositoryScope {
    RepositoryScope::new(["o/r1", "o/r2"])
}

/// Builds a router whose gateways talk to `server`.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid API base.
pub fn router_for(
    server: &MockServer,
    store: Arc<dyn SessionStore>,
    telemetry: Arc<dyn TelemetrySink>,
) -> Router {
    let api_base = ApiBase::parse(&server.uri())
        .unwrap_or_else(|error| panic!("mock server uri should parse: {error}"));
    DashboardAgent::new(
        scope(),
        store,
        Arc::new(OctocrabGatewayFactory::new(api_base)),
        telemetry,
    )
    .router()
}

/// Starts a memory-backed session for `token` and returns the `Cookie`
/// header value that selects it.
///
/// # Panics
///
/// Panics if the token is blank or the store rejects the session.
pub fn start_session(store: &MemorySessionStore, token: &str) -> String {
    let access_token =
        AccessToken::new(token).unwrap_or_else(|error| panic!("invalid token: {error}"));
    let id = store
        .create(Credential::new(access_token))
        .unwrap_or_else(|error| panic!("session should be created: {error}"));
    format!("access-token-session={id}")
}

/// Sends `GET uri` with an optional `Cookie` header.
///
/// # Panics
///
/// Panics if the request cannot be built or the router fails.
pub async fn get(router: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = cookie {
        builder = builder.header("cookie", value);
    }
    let request = builder
        .body(Body::empty())
        .unwrap_or_else(|error| panic!("request should build: {error}"));
    router
        .oneshot(request)
        .await
        .unwrap_or_else(|error| match error {})
}

/// Collects a response body as UTF-8 text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .unwrap_or_else(|error| panic!("body should collect: {error}"))
        .to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|error| panic!("body is not UTF-8: {error}"))
}

/// Every `Set-Cookie` value on the response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
        .collect()
}

/// Mounts `GET /user` answering with `status` and, on success, `login`.
pub async fn mount_user(
    server: &MockServer,
    status: u16,
    login: &str,
    expected_calls: impl Into<Times>,
) {
    let body = if status == 200 {
        json!({ "login": login, "id": 1 })
    } else {
        json!({ "message": "Bad credentials", "documentation_url": "https://docs.github.com/rest" })
    };
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// One page of a scripted search.
pub struct ScriptedPage<'a> {
    /// Cursor the request must carry; `None` for the first page.
    pub after: Option<&'a str>,
    /// Pull request numbers on the page.
    pub numbers: std::ops::Range<u64>,
    /// Cursor returned for the next page; `None` marks the last page.
    pub next: Option<&'a str>,
}

/// Mounts `POST /graphql` answers for each scripted page of `query`.
pub async fn mount_search(server: &MockServer, query: &str, pages: &[ScriptedPage<'_>]) {
    let mut remaining = 5000_u64;
    for page in pages {
        remaining -= 1;
        let numbers: Vec<u64> = page.numbers.clone().collect();
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "variables": { "query": query, "searchCursor": page.after }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page_body(
                &numbers,
                "o/r1",
                page.next.is_some(),
                page.next,
                (1, remaining),
            )))
            .expect(1)
            .mount(server)
            .await;
    }
}
