//! Construction of token-bound Octocrab gateways.

use crate::github::credential::AccessToken;
use crate::github::error::GitHubError;
use crate::github::locator::ApiBase;

use super::client::build_octocrab_client;
use super::{GatewayFactory, Gateways, OctocrabSearchGateway, OctocrabUserGateway};

/// Builds Octocrab gateways against a fixed API base.
#[derive(Debug, Clone)]
pub struct OctocrabGatewayFactory {
    api_base: ApiBase,
}

impl OctocrabGatewayFactory {
    /// Creates a factory targeting `api_base`.
    #[must_use]
    pub const fn new(api_base: ApiBase) -> Self {
        Self { api_base }
    }
}

impl GatewayFactory for OctocrabGatewayFactory {
    fn connect(&self, token: &AccessToken) -> Result<Gateways, GitHubError> {
        let client = build_octocrab_client(token, &self.api_base)?;
        Ok(Gateways {
            user: Box::new(OctocrabUserGateway::new(client.clone())),
            search: Box::new(OctocrabSearchGateway::new(client)),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::OctocrabGatewayFactory;
    use crate::github::credential::AccessToken;
    use crate::github::gateway::GatewayFactory;
    use crate::github::locator::ApiBase;

    #[tokio::test]
    async fn connected_gateways_share_the_configured_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octocat" })))
            .expect(1)
            .mount(&server)
            .await;

        let base = ApiBase::parse(&server.uri()).expect("mock server uri should parse");
        let factory = OctocrabGatewayFactory::new(base);
        let token = AccessToken::new("valid-token").expect("token should be valid");

        let gateways = factory.connect(&token).expect("gateways should build");
        let login = gateways
            .user
            .current_user()
            .await
            .expect("user should resolve");

        assert_eq!(login.as_str(), "octocat");
    }
}
