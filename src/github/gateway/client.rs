//! Authenticated Octocrab client for one access token.

use octocrab::Octocrab;

use crate::github::credential::AccessToken;
use crate::github::error::GitHubError;
use crate::github::locator::ApiBase;

use super::error_mapping::map_octocrab_error;

/// Client sending `token` as a bearer credential to `api_base`.
///
/// # Errors
///
/// Returns `GitHubError::InvalidUrl` if Octocrab refuses the base URI.
pub(super) fn build_octocrab_client(
    token: &AccessToken,
    api_base: &ApiBase,
) -> Result<Octocrab, GitHubError> {
    let builder = Octocrab::builder()
        .personal_token(token.value())
        .base_uri(api_base.as_str())
        .map_err(|error| GitHubError::InvalidUrl(format!("{}: {error}", api_base.as_str())))?;

    builder
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
