//! Error types exposed by the GitHub access layer.

use thiserror::Error;

/// Errors surfaced while communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubError {
    /// The access token was missing or blank.
    #[error("access token is required")]
    MissingToken,

    /// The configured API base could not be parsed.
    #[error("GitHub API base is invalid: {0}")]
    InvalidUrl(String),

    /// The access token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// The response could not be decoded or carried GraphQL errors.
    #[error("unexpected GitHub response: {message}")]
    InvalidResponse {
        /// Description of what was wrong with the payload.
        message: String,
    },

    /// The server reported more pages without a usable continuation cursor.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the stalled cursor.
        message: String,
    },
}

impl GitHubError {
    /// Returns true when GitHub refused the credential itself.
    ///
    /// Only this classification invalidates a session; every other variant
    /// is treated as transient by callers.
    #[must_use]
    pub const fn is_credential_rejected(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
