//! GitHub API base URL handling.

use url::Url;

use super::error::GitHubError;

/// Public GitHub REST/GraphQL API root.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Validated API base URL.
///
/// Accepts either the public API root or a GitHub Enterprise root such as
/// `https://ghe.example.com/api/v3`. A site URL for `github.com` is mapped to
/// the public API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses and validates an API base URL.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when the input is not an absolute
    /// `http`/`https` URL with a host.
    pub fn parse(input: &str) -> Result<Self, GitHubError> {
        let parsed =
            Url::parse(input.trim()).map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GitHubError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| GitHubError::InvalidUrl("URL must include a host".to_owned()))?;

        if host.eq_ignore_ascii_case("github.com") {
            return Url::parse(GITHUB_API_BASE)
                .map(Self)
                .map_err(|error| GitHubError::InvalidUrl(error.to_string()));
        }

        Ok(Self(parsed))
    }

    /// Borrow the URL as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
