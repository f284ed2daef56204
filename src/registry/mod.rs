//! Registry collaborators for fetching published version tags
//!
//! This module provides:
//! - The `VersionFetcher` boundary the core checks against
//! - A blocking HTTP client with retry logic
//! - Docker Hub tags adapter (token auth + tags/list)
//! - PyPI JSON API adapter
//! - A TTL cache decorator over any fetcher
//!
//! Fetchers return an empty sequence when nothing is published; only
//! transport/auth failures surface as errors.

mod cache;
mod client;
mod docker_hub;
mod pypi;

pub use cache::{CachedFetcher, DEFAULT_CACHE_TTL};
pub use client::HttpClient;
pub use docker_hub::DockerHubAdapter;
pub use pypi::PyPIAdapter;

use crate::component::{Component, ComponentKind};
use crate::error::RegistryError;

/// Boundary for listing the version tags currently published for a component
pub trait VersionFetcher {
    /// Fetch raw tag strings for a component. Empty means nothing published.
    fn fetch_versions(&self, component: &Component) -> Result<Vec<String>, RegistryError>;
}

/// Fetcher dispatching on the component variant to the right registry
pub struct RegistryFetcher {
    docker_hub: DockerHubAdapter,
    pypi: PyPIAdapter,
}

impl RegistryFetcher {
    /// Create a fetcher sharing one HTTP client across registries
    pub fn new(client: HttpClient) -> Self {
        Self {
            docker_hub: DockerHubAdapter::new(client.clone()),
            pypi: PyPIAdapter::new(client),
        }
    }
}

impl VersionFetcher for RegistryFetcher {
    fn fetch_versions(&self, component: &Component) -> Result<Vec<String>, RegistryError> {
        match component.kind {
            ComponentKind::DockerImage => self
                .docker_hub
                .fetch_tags(&component.repository, &component.name),
            ComponentKind::Pypi => self.pypi.fetch_versions(&component.name),
        }
    }
}

/// Deterministic fetcher for core tests: canned tags, call counting,
/// optional transport failure.
#[cfg(test)]
pub struct FakeFetcher {
    tags: Vec<String>,
    fail: bool,
    calls: std::cell::Cell<usize>,
}

#[cfg(test)]
impl FakeFetcher {
    pub fn new(tags: Vec<&str>) -> Self {
        Self {
            tags: tags.into_iter().map(String::from).collect(),
            fail: false,
            calls: std::cell::Cell::new(0),
        }
    }

    /// A fetcher that errors on every call; frozen components must never
    /// reach it.
    pub fn failing() -> Self {
        Self {
            tags: Vec::new(),
            fail: true,
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[cfg(test)]
impl VersionFetcher for FakeFetcher {
    fn fetch_versions(&self, component: &Component) -> Result<Vec<String>, RegistryError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(RegistryError::network_error(
                &component.name,
                "fake",
                "transport failure requested by test",
            ));
        }
        Ok(self.tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[test]
    fn test_fake_fetcher_counts_calls() {
        let fetcher = FakeFetcher::new(vec!["1.0.0"]);
        let c = Component::new(ComponentKind::Pypi, "widget", "0.1.0", None);
        assert_eq!(fetcher.calls(), 0);
        fetcher.fetch_versions(&c).unwrap();
        fetcher.fetch_versions(&c).unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[test]
    fn test_fake_fetcher_failing() {
        let fetcher = FakeFetcher::failing();
        let c = Component::new(ComponentKind::Pypi, "widget", "0.1.0", None);
        assert!(fetcher.fetch_versions(&c).is_err());
        assert_eq!(fetcher.calls(), 1);
    }
}
