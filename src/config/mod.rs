//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pr-status.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PR_STATUS_*`, e.g.
//!    `PR_STATUS_REPOSITORIES`
//! 4. **Command-line arguments** – `--repositories`, `--listen-address`, ...
//!
//! # Configuration File
//!
//! ```toml
//! listen_address = "0.0.0.0:8080"
//! github_api_base = "https://api.github.com"
//! repositories = "kubernetes/kubernetes,kubernetes/test-infra"
//! session_secret = "change-me"
//! session_max_age_seconds = 2592000
//! log_level = "info"
//! ```

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardError;
use crate::github::locator::{ApiBase, GITHUB_API_BASE};
use crate::github::query::RepositoryScope;
use crate::session::DEFAULT_SESSION_MAX_AGE_SECONDS;

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Server configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pr_status::PrStatusConfig;
///
/// let config = PrStatusConfig::load().expect("failed to load configuration");
/// let settings = config.into_settings().expect("configuration should be valid");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PR_STATUS",
    discovery(
        dotfile_name = ".pr-status.toml",
        config_file_name = "pr-status.toml",
        app_name = "pr-status"
    )
)]
pub struct PrStatusConfig {
    /// Socket address the HTTP server binds to.
    ///
    /// Can be provided via:
    /// - CLI: `--listen-address <ADDR>` or `-l <ADDR>`
    /// - Environment: `PR_STATUS_LISTEN_ADDRESS`
    /// - Config file: `listen_address = "..."`
    #[ortho_config(cli_short = 'l')]
    pub listen_address: String,

    /// GitHub API root, e.g. `https://ghe.example.com/api/v3`.
    #[ortho_config()]
    pub github_api_base: String,

    /// Comma-separated `owner/name` repositories searched by default.
    ///
    /// Can be provided via:
    /// - CLI: `--repositories <LIST>` or `-r <LIST>`
    /// - Environment: `PR_STATUS_REPOSITORIES`
    /// - Config file: `repositories = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repositories: Option<String>,

    /// Secret used to sign session cookies.
    ///
    /// When unset, sessions live in process memory and are lost on restart.
    #[ortho_config()]
    pub session_secret: Option<String>,

    /// Lifetime of the session cookie, in seconds. Defaults to 30 days.
    #[ortho_config()]
    pub session_max_age_seconds: u64,

    /// Writes search telemetry to stderr as JSON lines.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so only the CLI flag and config file are honoured.
    #[ortho_config()]
    pub telemetry_jsonl: bool,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[ortho_config()]
    pub log_level: String,
}

impl Default for PrStatusConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_owned(),
            github_api_base: GITHUB_API_BASE.to_owned(),
            repositories: None,
            session_secret: None,
            session_max_age_seconds: DEFAULT_SESSION_MAX_AGE_SECONDS,
            telemetry_jsonl: false,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

/// Validated, immutable settings derived from [`PrStatusConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Address to bind.
    pub listen_address: SocketAddr,
    /// GitHub API root.
    pub api_base: ApiBase,
    /// Default repository scope.
    pub scope: RepositoryScope,
    /// Session signing secret, if configured.
    pub session_secret: Option<String>,
    /// Session cookie lifetime in seconds.
    pub session_max_age_seconds: u64,
    /// Whether telemetry goes to stderr as JSON lines.
    pub telemetry_jsonl: bool,
    /// Default log filter.
    pub log_level: String,
}

impl PrStatusConfig {
    /// Repository scope parsed from [`Self::repositories`].
    #[must_use]
    pub fn repository_scope(&self) -> RepositoryScope {
        self.repositories
            .as_deref()
            .map(RepositoryScope::from_list)
            .unwrap_or_default()
    }

    /// Validates the configuration and converts it into settings.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Configuration`] when the listen address or
    /// API base cannot be parsed, or the session secret is blank.
    pub fn into_settings(self) -> Result<DashboardSettings, DashboardError> {
        let listen_address = self
            .listen_address
            .trim()
            .parse::<SocketAddr>()
            .map_err(|error| DashboardError::Configuration {
                message: format!(
                    "listen_address `{}` is invalid: {error}",
                    self.listen_address
                ),
            })?;
        let scope = self.repository_scope();

        let api_base =
            ApiBase::parse(&self.github_api_base).map_err(|error| DashboardError::Configuration {
                message: error.to_string(),
            })?;

        let session_secret = match self.session_secret {
            Some(secret) if secret.trim().is_empty() => {
                return Err(DashboardError::Configuration {
                    message: "session_secret must not be blank".to_owned(),
                });
            }
            other => other,
        };

        Ok(DashboardSettings {
            listen_address,
            api_base,
            scope,
            session_secret,
            session_max_age_seconds: self.session_max_age_seconds,
            telemetry_jsonl: self.telemetry_jsonl,
            log_level: self.log_level,
        })
    }
}

#[cfg(test)]
mod tests;
