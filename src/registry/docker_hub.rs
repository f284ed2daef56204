//! Docker Hub tags adapter
//!
//! Two-step fetch against the public registry API:
//! 1. anonymous pull token from https://auth.docker.io/token
//! 2. tag list from https://index.docker.io/v2/{repo}/{image}/tags/list

use crate::error::RegistryError;
use crate::registry::HttpClient;
use serde::Deserialize;

/// Token endpoint for anonymous pull access
const AUTH_URL: &str = "https://auth.docker.io/token";

/// Registry v2 API base URL
const INDEX_URL: &str = "https://index.docker.io/v2";

/// Service identifier expected by the token endpoint
const AUTH_SERVICE: &str = "registry.docker.io";

/// Registry name used in error messages
const REGISTRY_NAME: &str = "Docker Hub";

/// Docker Hub adapter
pub struct DockerHubAdapter {
    client: HttpClient,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// tags/list response
#[derive(Debug, Deserialize)]
struct TagsResponse {
    /// Absent when the repository has no tags
    tags: Option<Vec<String>>,
}

impl DockerHubAdapter {
    /// Create a new Docker Hub adapter
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the token URL for a repository/image pair
    fn token_url(&self, repository: &str, image: &str) -> String {
        format!(
            "{}?service={}&scope=repository:{}/{}:pull",
            AUTH_URL, AUTH_SERVICE, repository, image
        )
    }

    /// Build the tags/list URL for a repository/image pair
    fn tags_url(&self, repository: &str, image: &str) -> String {
        format!("{}/{}/{}/tags/list", INDEX_URL, repository, image)
    }

    /// Fetch the published tags for an image. An unknown image yields an
    /// empty list; failing to obtain a pull token is an auth error.
    pub fn fetch_tags(&self, repository: &str, image: &str) -> Result<Vec<String>, RegistryError> {
        let token: TokenResponse = self
            .client
            .get_json(&self.token_url(repository, image), image, REGISTRY_NAME)?
            .ok_or_else(|| RegistryError::AuthenticationError {
                registry: REGISTRY_NAME.to_string(),
                message: "could not get pull token".to_string(),
            })?;

        let tags: Option<TagsResponse> = self.client.get_json_with_bearer(
            &self.tags_url(repository, image),
            image,
            REGISTRY_NAME,
            Some(&token.token),
        )?;

        Ok(tags.and_then(|t| t.tags).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> DockerHubAdapter {
        DockerHubAdapter::new(HttpClient::new().unwrap())
    }

    #[test]
    fn test_token_url() {
        assert_eq!(
            adapter().token_url("acme", "app"),
            "https://auth.docker.io/token?service=registry.docker.io&scope=repository:acme/app:pull"
        );
    }

    #[test]
    fn test_tags_url() {
        assert_eq!(
            adapter().tags_url("library", "nginx"),
            "https://index.docker.io/v2/library/nginx/tags/list"
        );
    }

    #[test]
    fn test_tags_response_parsing() {
        let json = r#"{"name": "acme/app", "tags": ["1.0.0", "1.1.0", "latest"]}"#;
        let parsed: TagsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.tags.unwrap(),
            vec!["1.0.0", "1.1.0", "latest"]
        );
    }

    #[test]
    fn test_tags_response_without_tags() {
        let json = r#"{"name": "acme/app"}"#;
        let parsed: TagsResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.tags.is_none());
    }

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{"token": "abc123", "expires_in": 300}"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.token, "abc123");
    }
}
