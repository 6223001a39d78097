//! Request-level errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::github::error::GitHubError;
use crate::session::{ReconcileError, SessionError};

/// Errors surfaced while serving the dashboard.
///
/// Every variant renders as HTTP 500 naming the failed action; the cause is
/// logged, never sent to the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// Reading or writing the session failed.
    #[error("{action}: {source}")]
    SessionStore {
        /// Action that failed, e.g. `getting session`.
        action: &'static str,
        /// Underlying store error.
        source: SessionError,
    },

    /// A GitHub call failed for a reason other than credential rejection.
    #[error("{action}: {source}")]
    Remote {
        /// Action that failed, e.g. `getting user login`.
        action: &'static str,
        /// Underlying GitHub error.
        source: GitHubError,
    },

    /// The response body could not be produced.
    #[error("{action}: {message}")]
    Serialization {
        /// Action that failed.
        action: &'static str,
        /// Serializer message.
        message: String,
    },

    /// Configuration is missing or invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// Binding or serving the listener failed.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the problem.
        message: String,
    },
}

impl DashboardError {
    /// Short description of the failed action, safe to show to clients.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::SessionStore { action, .. }
            | Self::Remote { action, .. }
            | Self::Serialization { action, .. } => *action,
            Self::Configuration { .. } => "loading configuration",
            Self::Io { .. } => "serving request",
        }
    }

    pub(crate) fn from_reconcile(error: ReconcileError) -> Self {
        match error {
            ReconcileError::SessionStore(source) => Self::SessionStore {
                action: "saving session",
                source,
            },
            ReconcileError::Remote(source) => Self::Remote {
                action: "getting user login",
                source,
            },
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("500 Internal server error {}.", self.action()),
        )
            .into_response()
    }
}
