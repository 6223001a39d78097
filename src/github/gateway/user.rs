//! Octocrab implementation of the identity gateway.

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::github::credential::AccessToken;
use crate::github::error::GitHubError;
use crate::github::locator::ApiBase;
use crate::github::models::{ApiUser, Login};

use super::UserGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{decode_error, map_octocrab_error};

const OPERATION: &str = "load authenticated user";

/// Octocrab-backed identity gateway calling `GET /user`.
pub struct OctocrabUserGateway {
    client: Octocrab,
}

impl OctocrabUserGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when the base URI cannot be parsed or
    /// `GitHubError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &AccessToken, api_base: &ApiBase) -> Result<Self, GitHubError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl UserGateway for OctocrabUserGateway {
    async fn current_user(&self) -> Result<Login, GitHubError> {
        let raw = self
            .client
            .get::<serde_json::Value, _, _>("/user", None::<&()>)
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        let user: ApiUser =
            serde_json::from_value(raw).map_err(|error| decode_error(OPERATION, &error))?;

        Login::new(user.login).ok_or_else(|| GitHubError::InvalidResponse {
            message: format!("{OPERATION} returned a blank login"),
        })
    }
}
