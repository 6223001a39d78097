//! Browser sessions holding the viewer's access credential.
//!
//! A session is looked up from the request's cookies, read and mutated by
//! the reconciler, then saved back; saving writes any `Set-Cookie` values the
//! backend needs into a [`ResponseCookies`] collector. Two backends are
//! provided: an in-process map keyed by a random session id, and a stateless
//! HMAC-signed cookie.

pub mod cookies;
mod memory;
pub mod reconciler;
mod signed;

use http::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::github::credential::Credential;
use crate::github::models::Login;

pub use cookies::ResponseCookies;
pub use memory::MemorySessionStore;
pub use reconciler::{ReconcileError, SessionOutcome, SessionReconciler};
pub use signed::SignedCookieSessionStore;

/// Name of the cookie carrying the session.
pub const SESSION_COOKIE: &str = "access-token-session";

/// Name of the client-readable identity cookie.
pub const LOGIN_COOKIE: &str = "github_login";

/// Default session lifetime: 30 days.
pub const DEFAULT_SESSION_MAX_AGE_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Errors raised by a session backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session could not be read.
    #[error("failed to load session: {message}")]
    Load {
        /// Failure detail.
        message: String,
    },

    /// The session could not be written.
    #[error("failed to save session: {message}")]
    Save {
        /// Failure detail.
        message: String,
    },

    /// A signed session cookie failed verification.
    #[error("session cookie signature is invalid")]
    Signature,
}

/// Values stored in a session record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionValues {
    /// Access credential issued by the OAuth flow.
    #[serde(rename = "access-token", default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    /// Login verified during the most recent successful validation.
    #[serde(rename = "login", default, skip_serializing_if = "Option::is_none")]
    pub login: Option<Login>,
}

/// A session record loaded for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    id: Option<String>,
    values: SessionValues,
    expired: bool,
}

impl Session {
    /// Creates a session with the given backend id and values.
    #[must_use]
    pub const fn new(id: Option<String>, values: SessionValues) -> Self {
        Self {
            id,
            values,
            expired: false,
        }
    }

    /// Backend-specific identifier, if the backend uses one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Stored credential, if any.
    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        self.values.credential.as_ref()
    }

    /// Stored login, if any.
    #[must_use]
    pub const fn login(&self) -> Option<&Login> {
        self.values.login.as_ref()
    }

    /// Records the verified login.
    pub fn set_login(&mut self, login: Login) {
        self.values.login = Some(login);
    }

    /// Borrow every stored value.
    #[must_use]
    pub const fn values(&self) -> &SessionValues {
        &self.values
    }

    /// Marks the session for deletion on the next save.
    pub fn expire(&mut self) {
        self.expired = true;
        self.values = SessionValues::default();
    }

    /// Returns true once [`Session::expire`] has been called.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }
}

/// Backend that loads and persists sessions.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Load the session referenced by the request cookies.
    ///
    /// A request without a session cookie yields an empty session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the cookie is present but unreadable.
    fn load(&self, headers: &HeaderMap) -> Result<Session, SessionError>;

    /// Persist `session`, appending any cookies the backend needs.
    ///
    /// An expired session is deleted and its cookie cleared.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Save` when the record cannot be written.
    fn save(&self, session: &Session, cookies: &mut ResponseCookies) -> Result<(), SessionError>;
}
