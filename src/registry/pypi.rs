//! PyPI JSON API adapter
//!
//! Fetches release versions from https://pypi.org/pypi/{package}/json.
//! An unknown package (404) yields an empty list rather than an error.

use crate::error::RegistryError;
use crate::registry::HttpClient;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// Registry name used in error messages
const REGISTRY_NAME: &str = "PyPI";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
}

/// PyPI package metadata response; only the release keys matter here
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    /// Release information keyed by version string
    releases: HashMap<String, Value>,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", PYPI_API_URL, package)
    }

    /// Fetch the published versions for a package
    pub fn fetch_versions(&self, package: &str) -> Result<Vec<String>, RegistryError> {
        let response: Option<PyPIResponse> =
            self.client
                .get_json(&self.build_url(package), package, REGISTRY_NAME)?;

        Ok(response
            .map(|r| r.releases.into_keys().collect())
            .unwrap_or_default())
    }
}
