//! Token validation through the authenticated-user endpoint.

use super::error::GitHubError;
use super::gateway::UserGateway;
use super::models::Login;

/// Result of checking a credential against GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityOutcome {
    /// The token is live and belongs to this login.
    Valid(Login),
    /// GitHub refused the token; the session must be invalidated.
    Rejected,
    /// The check could not be completed; the session is left untouched.
    Transient(GitHubError),
}

/// Classifies the current token by calling `GET /user`.
///
/// Only an authentication failure yields [`IdentityOutcome::Rejected`].
/// Network errors, rate limiting and other API failures are transient.
pub async fn validate_identity(gateway: &dyn UserGateway) -> IdentityOutcome {
    match gateway.current_user().await {
        Ok(login) => IdentityOutcome::Valid(login),
        Err(error) if error.is_credential_rejected() => {
            tracing::debug!(%error, "access token rejected");
            IdentityOutcome::Rejected
        }
        Err(error) => IdentityOutcome::Transient(error),
    }
}
