//! Per-request reconciliation of the stored session with GitHub's view of
//! the access token.
//!
//! ```text
//! no usable credential ──────────────────────────────► LoggedOut
//! credential ─► GET /user ─┬─ valid(login) ─ save ───► LoggedIn(login)
//!                          ├─ rejected ─ expire ─────► LoggedOut
//!                          └─ transient ────────────► error
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::cookies::{expired_login_cookie, login_cookie};
use super::{ResponseCookies, Session, SessionError, SessionStore};
use crate::github::error::GitHubError;
use crate::github::gateway::{GatewayFactory, SearchGateway};
use crate::github::identity::{IdentityOutcome, validate_identity};
use crate::github::models::Login;

/// Terminal state of reconciliation.
pub enum SessionOutcome {
    /// No usable credential, or GitHub rejected it.
    LoggedOut,
    /// The credential is live.
    LoggedIn {
        /// Verified login.
        login: Login,
        /// Search gateway bound to the verified credential.
        search: Box<dyn SearchGateway>,
    },
}

impl fmt::Debug for SessionOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedOut => formatter.write_str("LoggedOut"),
            Self::LoggedIn { login, .. } => formatter
                .debug_struct("LoggedIn")
                .field("login", login)
                .finish_non_exhaustive(),
        }
    }
}

/// Reconciliation failures. Every variant is a server error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The session could not be persisted.
    #[error(transparent)]
    SessionStore(#[from] SessionError),

    /// The identity check failed for a reason other than rejection, or no
    /// client could be built.
    #[error(transparent)]
    Remote(#[from] GitHubError),
}

/// Drives the session state machine against the session store.
#[derive(Clone)]
pub struct SessionReconciler {
    store: Arc<dyn SessionStore>,
    gateways: Arc<dyn GatewayFactory>,
}

impl SessionReconciler {
    /// Creates a reconciler persisting through `store` and validating with
    /// gateways from `gateways`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, gateways: Arc<dyn GatewayFactory>) -> Self {
        Self { store, gateways }
    }

    /// Reconcile `session` as of `now`, appending any cookie changes.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::Remote` on a transient identity failure (the
    /// session is left untouched) and `ReconcileError::SessionStore` when
    /// persisting fails. When expiring a rejected session fails to persist,
    /// the identity cookie is not touched.
    pub async fn reconcile(
        &self,
        session: &mut Session,
        cookies: &mut ResponseCookies,
        now: DateTime<Utc>,
    ) -> Result<SessionOutcome, ReconcileError> {
        let Some(credential) = session.credential().filter(|c| c.is_valid_at(now)) else {
            return Ok(SessionOutcome::LoggedOut);
        };

        let gateways = self.gateways.connect(credential.token())?;

        match validate_identity(gateways.user.as_ref()).await {
            IdentityOutcome::Valid(login) => {
                session.set_login(login.clone());
                self.store.save(session, cookies)?;
                cookies.push(login_cookie(login.as_str(), now));
                tracing::debug!(%login, "session validated");
                Ok(SessionOutcome::LoggedIn {
                    login,
                    search: gateways.search,
                })
            }
            IdentityOutcome::Rejected => {
                session.expire();
                self.store.save(session, cookies)?;
                cookies.push(expired_login_cookie());
                tracing::info!("access token rejected; session expired");
                Ok(SessionOutcome::LoggedOut)
            }
            IdentityOutcome::Transient(error) => Err(error.into()),
        }
    }
}
