//! Tests for the request flow and the axum handler.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use mockall::predicate::eq;
use rstest::rstest;
use tower::ServiceExt;

use super::{DashboardAgent, DashboardError, StatusParams};
use crate::github::credential::{AccessToken, Credential};
use crate::github::error::GitHubError;
use crate::github::gateway::{
    Gateways, MockGatewayFactory, MockSearchGateway, MockUserGateway, SearchPage,
};
use crate::github::models::Login;
use crate::github::models::test_support::minimal_pull_request;
use crate::github::pagination::PageInfo;
use crate::github::query::{RepositoryScope, SearchQuery};
use crate::github::rate_limit::QuotaSnapshot;
use crate::session::{MemorySessionStore, SessionStore, SignedCookieSessionStore};
use crate::telemetry::{NoopTelemetrySink, RecordingTelemetrySink, TelemetryEvent};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("timestamp should be valid")
}

fn scope() -> RepositoryScope {
    RepositoryScope::new(["o/r1", "o/r2"])
}

fn session_headers(store: &MemorySessionStore) -> HeaderMap {
    let token = AccessToken::new("gho_abc").expect("token should be valid");
    let id = store
        .create(Credential::new(token))
        .expect("create should succeed");
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("access-token-session={id}"))
            .expect("header should be valid"),
    );
    headers
}

fn unused_factory() -> MockGatewayFactory {
    let mut factory = MockGatewayFactory::new();
    factory.expect_connect().times(0);
    factory
}

fn factory_with(user: MockUserGateway, search: MockSearchGateway) -> MockGatewayFactory {
    let mut factory = MockGatewayFactory::new();
    factory.expect_connect().times(1).return_once(move |_| {
        Ok(Gateways {
            user: Box::new(user),
            search: Box::new(search),
        })
    });
    factory
}

fn user_returning(result: Result<Login, GitHubError>) -> MockUserGateway {
    let mut user = MockUserGateway::new();
    user.expect_current_user()
        .times(1)
        .return_once(move || result);
    user
}

fn octocat() -> Result<Login, GitHubError> {
    Login::new("octocat").ok_or(GitHubError::MissingToken)
}

fn single_page_search(expected_query: &str) -> MockSearchGateway {
    let mut search = MockSearchGateway::new();
    search
        .expect_search_page()
        .with(eq(SearchQuery::new(expected_query)), eq(None))
        .times(1)
        .return_once(|_, _| {
            Ok(SearchPage {
                pull_requests: vec![minimal_pull_request(1, "o/r1")],
                page_info: PageInfo::last(),
                quota: QuotaSnapshot::new(1, 4999),
            })
        });
    search
}

fn agent(
    store: Arc<dyn SessionStore>,
    factory: MockGatewayFactory,
    telemetry: Arc<RecordingTelemetrySink>,
) -> DashboardAgent {
    DashboardAgent::new(scope(), store, Arc::new(factory), telemetry)
}

#[tokio::test]
async fn visitor_without_session_is_logged_out_without_remote_calls() {
    let store = Arc::new(MemorySessionStore::new(3600));
    let sink = Arc::new(RecordingTelemetrySink::default());

    let handled = agent(store, unused_factory(), sink.clone())
        .handle(&HeaderMap::new(), &StatusParams::default(), now())
        .await
        .expect("request should succeed");

    assert!(!handled.data.is_logged_in());
    assert!(handled.data.pull_requests().is_empty());
    assert!(handled.cookies.is_empty());
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn rejected_token_expires_session_and_identity_cookie() {
    let store = Arc::new(MemorySessionStore::new(3600));
    let headers = session_headers(&store);
    let factory = factory_with(
        user_returning(Err(GitHubError::Authentication {
            message: "Bad credentials".to_owned(),
        })),
        MockSearchGateway::new(),
    );

    let handled = agent(store.clone(), factory, Arc::default())
        .handle(&headers, &StatusParams::default(), now())
        .await
        .expect("request should succeed");

    assert!(!handled.data.is_logged_in());
    assert!(store.is_empty(), "session record should be deleted");
    let cookies: Vec<&str> = handled.cookies.iter().collect();
    assert!(cookies.iter().any(|c| c.starts_with("access-token-session=;")));
    assert!(cookies.iter().any(|c| c.starts_with("github_login=;")));
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn valid_token_searches_default_query_and_records_cost() {
    let store = Arc::new(MemorySessionStore::new(3600));
    let headers = session_headers(&store);
    let sink = Arc::new(RecordingTelemetrySink::default());
    let expected = r#"is:pr state:open author:octocat repo:"o/r1" repo:"o/r2""#;
    let factory = factory_with(user_returning(octocat()), single_page_search(expected));

    let handled = agent(store.clone(), factory, sink.clone())
        .handle(&headers, &StatusParams::default(), now())
        .await
        .expect("request should succeed");

    assert!(handled.data.is_logged_in());
    assert_eq!(handled.data.pull_requests().len(), 1);
    let reloaded = store.load(&headers).expect("load should succeed");
    assert_eq!(reloaded.login().map(Login::as_str), Some("octocat"));
    assert!(
        handled
            .cookies
            .iter()
            .any(|c| c.starts_with("github_login=octocat;"))
    );
    assert_eq!(
        sink.take(),
        vec![TelemetryEvent::SearchCompleted {
            query: expected.to_owned(),
            total_cost: 1,
            remaining: Some(4999),
            pages: 1,
            results: 1,
        }]
    );
}

#[rstest]
#[case::unscoped_override("is:pr author:someone", r#"is:pr author:someone repo:"o/r1" repo:"o/r2""#)]
#[case::org_override("is:pr org:kubernetes", "is:pr org:kubernetes")]
#[case::repo_override(r#"is:pr repo:"a/b""#, r#"is:pr repo:"a/b""#)]
#[case::blank_override("  ", r#"is:pr state:open author:octocat repo:"o/r1" repo:"o/r2""#)]
#[tokio::test]
async fn override_query_is_scoped_only_when_unscoped(
    #[case] override_query: &str,
    #[case] expected: &str,
) {
    let store = Arc::new(MemorySessionStore::new(3600));
    let headers = session_headers(&store);
    let factory = factory_with(user_returning(octocat()), single_page_search(expected));
    let params = StatusParams {
        query: Some(override_query.to_owned()),
        var: None,
    };

    let handled = agent(store, factory, Arc::default())
        .handle(&headers, &params, now())
        .await
        .expect("request should succeed");

    assert!(handled.data.is_logged_in());
}

#[tokio::test]
async fn search_failure_is_a_remote_error() {
    let store = Arc::new(MemorySessionStore::new(3600));
    let headers = session_headers(&store);
    let mut search = MockSearchGateway::new();
    search.expect_search_page().times(1).return_once(|_, _| {
        Err(GitHubError::Api {
            message: "502 Bad Gateway".to_owned(),
        })
    });
    let factory = factory_with(user_returning(octocat()), search);

    let result = agent(store, factory, Arc::default())
        .handle(&headers, &StatusParams::default(), now())
        .await;

    assert!(
        matches!(
            result,
            Err(DashboardError::Remote {
                action: "querying user data",
                ..
            })
        ),
        "got {result:?}"
    );
}

#[tokio::test]
async fn transient_identity_failure_is_a_remote_error() {
    let store = Arc::new(MemorySessionStore::new(3600));
    let headers = session_headers(&store);
    let factory = factory_with(
        user_returning(Err(GitHubError::Network {
            message: "timeout".to_owned(),
        })),
        MockSearchGateway::new(),
    );

    let result = agent(store.clone(), factory, Arc::default())
        .handle(&headers, &StatusParams::default(), now())
        .await;

    assert!(
        matches!(
            result,
            Err(DashboardError::Remote {
                action: "getting user login",
                ..
            })
        ),
        "got {result:?}"
    );
    assert_eq!(store.len(), 1, "session must be left untouched");
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

#[tokio::test]
async fn router_wraps_body_in_variable() {
    let router = DashboardAgent::new(
        scope(),
        Arc::new(MemorySessionStore::new(3600)),
        Arc::new(unused_factory()),
        Arc::new(NoopTelemetrySink),
    )
    .router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/pr-status?var=data")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/javascript")
    );
    assert_eq!(body_text(response).await, r#"var data = {"Login":false};"#);
}

#[tokio::test]
async fn router_reports_unreadable_session_as_server_error() {
    let router = DashboardAgent::new(
        scope(),
        Arc::new(SignedCookieSessionStore::new("secret", 3600)),
        Arc::new(unused_factory()),
        Arc::new(NoopTelemetrySink),
    )
    .router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/pr-status")
                .header(COOKIE, "access-token-session=forged.value")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(
        body_text(response).await,
        "500 Internal server error getting session."
    );
}

#[rstest]
#[case::absent(None, None, None)]
#[case::both(Some("query=is%3Apr+org%3Ax&var=data"), Some("is:pr org:x"), Some("data"))]
#[case::repeated(Some("var=a&query=x&var=b&query=y"), Some("x"), Some("a"))]
#[case::unknown_ignored(Some("page=2&var=data"), None, Some("data"))]
fn query_string_keeps_first_value(
    #[case] raw: Option<&str>,
    #[case] query: Option<&str>,
    #[case] var: Option<&str>,
) {
    let params = StatusParams::from_query_string(raw);

    assert_eq!(params.query.as_deref(), query);
    assert_eq!(params.var.as_deref(), var);
}

#[tokio::test]
async fn router_accepts_repeated_parameters() {
    let router = DashboardAgent::new(
        scope(),
        Arc::new(MemorySessionStore::new(3600)),
        Arc::new(unused_factory()),
        Arc::new(NoopTelemetrySink),
    )
    .router();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/pr-status?var=a&var=b&query=x&query=y")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"var a = {"Login":false};"#);
}
