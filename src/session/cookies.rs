//! `Set-Cookie` construction and request cookie parsing.

use chrono::{DateTime, Duration, Utc};
use http::HeaderMap;
use http::header::{COOKIE, HeaderValue, SET_COOKIE};

use super::{LOGIN_COOKIE, SESSION_COOKIE};

/// Lifetime of the identity cookie after a successful validation.
pub const LOGIN_COOKIE_MAX_AGE_DAYS: i64 = 30;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Ordered `Set-Cookie` values produced while handling a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCookies(Vec<String>);

impl ResponseCookies {
    /// Appends a `Set-Cookie` value.
    pub fn push(&mut self, cookie: String) {
        self.0.push(cookie);
    }

    /// Iterates the values in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns true if no cookie was produced.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes every value as a `Set-Cookie` header.
    ///
    /// Values that are not valid header text are dropped with a warning.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for cookie in &self.0 {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(error) => tracing::warn!(%error, "dropping unencodable Set-Cookie value"),
            }
        }
    }
}

/// Identity cookie naming `login`, valid for 30 days from `now`.
#[must_use]
pub fn login_cookie(login: &str, now: DateTime<Utc>) -> String {
    let expires = now + Duration::days(LOGIN_COOKIE_MAX_AGE_DAYS);
    format!(
        "{LOGIN_COOKIE}={login}; Path=/; Expires={expires}; Secure",
        expires = expires.format(HTTP_DATE_FORMAT)
    )
}

/// Identity cookie that the browser discards immediately.
#[must_use]
pub fn expired_login_cookie() -> String {
    format!("{LOGIN_COOKIE}=; Path=/; Expires={EPOCH_HTTP_DATE}; Max-Age=0; Secure")
}

/// Session cookie carrying `value` for `max_age_seconds`.
#[must_use]
pub fn session_cookie(value: &str, max_age_seconds: u64) -> String {
    format!(
        "{SESSION_COOKIE}={value}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age_seconds}"
    )
}

/// Session cookie that the browser discards immediately.
#[must_use]
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0")
}

/// Reads a named cookie from the request headers.
///
/// Blank values are treated as absent.
#[must_use]
pub fn extract_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|raw| raw.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim() == cookie_name)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
