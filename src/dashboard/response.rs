//! Response payload and its JSON / JavaScript-variable rendering.

use serde::Serialize;

use super::error::DashboardError;
use crate::github::models::PullRequest;

/// Body returned by `GET /pr-status`.
///
/// `PullRequests` is omitted when `Login` is false and always present, even
/// if empty, when it is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserData {
    login: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pull_requests: Option<Vec<PullRequest>>,
}

impl UserData {
    /// Payload for a visitor without a valid session.
    #[must_use]
    pub const fn logged_out() -> Self {
        Self {
            login: false,
            pull_requests: None,
        }
    }

    /// Payload for a validated user.
    #[must_use]
    pub const fn logged_in(pull_requests: Vec<PullRequest>) -> Self {
        Self {
            login: true,
            pull_requests: Some(pull_requests),
        }
    }

    /// Whether the viewer is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.login
    }

    /// Pull requests found for the viewer.
    #[must_use]
    pub fn pull_requests(&self) -> &[PullRequest] {
        self.pull_requests.as_deref().unwrap_or_default()
    }
}

/// Rendered body plus the content type it should be served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// Body text.
    pub body: String,
}

const JSON: &str = "application/json";
const JAVASCRIPT: &str = "application/javascript";

/// Serialises `data`, wrapping it as `var <name> = <json>;` when a valid
/// variable name is supplied.
///
/// A name that is not a JavaScript identifier is ignored and raw JSON is
/// returned.
///
/// # Errors
///
/// Returns `DashboardError::Serialization` if the payload cannot be encoded.
pub fn render(data: &UserData, var: Option<&str>) -> Result<RenderedBody, DashboardError> {
    let json = serde_json::to_string(data).map_err(|error| DashboardError::Serialization {
        action: "marshaling user data",
        message: error.to_string(),
    })?;

    match var.filter(|name| !name.is_empty()) {
        Some(name) if is_js_identifier(name) => Ok(RenderedBody {
            content_type: JAVASCRIPT,
            body: format!("var {name} = {json};"),
        }),
        Some(name) => {
            tracing::warn!(var = name, "ignoring invalid variable name");
            Ok(RenderedBody {
                content_type: JSON,
                body: json,
            })
        }
        None => Ok(RenderedBody {
            content_type: JSON,
            body: json,
        }),
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|rest| rest.is_ascii_alphanumeric() || rest == '_' || rest == '$')
}
