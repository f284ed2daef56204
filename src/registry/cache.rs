//! TTL cache decorator over a version fetcher
//!
//! An explicitly constructed cache object scoped to a single invocation —
//! no ambient or static state. Sits in front of any `VersionFetcher`, so
//! the core stays oblivious to staleness policy.

use crate::component::Component;
use crate::error::RegistryError;
use crate::registry::VersionFetcher;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default staleness window for cached tag lists (3 days)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

struct CacheEntry {
    fetched_at: Instant,
    tags: Vec<String>,
}

/// Caching decorator; entries expire after the injected TTL
pub struct CachedFetcher<F> {
    inner: F,
    ttl: Duration,
    entries: RefCell<HashMap<String, CacheEntry>>,
}

impl<F> CachedFetcher<F> {
    /// Wrap a fetcher with the default TTL
    pub fn new(inner: F) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    /// Wrap a fetcher with an explicit TTL. A zero TTL disables caching.
    pub fn with_ttl(inner: F, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Cache key: variant, repository, and name together identify a fetch
    fn key(component: &Component) -> String {
        format!(
            "{}/{}/{}",
            component.kind.as_str(),
            component.repository,
            component.name
        )
    }
}

impl<F: VersionFetcher> VersionFetcher for CachedFetcher<F> {
    fn fetch_versions(&self, component: &Component) -> Result<Vec<String>, RegistryError> {
        let key = Self::key(component);

        if let Some(entry) = self.entries.borrow().get(&key) {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.tags.clone());
            }
        }

        let tags = self.inner.fetch_versions(component)?;
        self.entries.borrow_mut().insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                tags: tags.clone(),
            },
        );
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentKind};
    use crate::registry::FakeFetcher;

    fn widget() -> Component {
        Component::new(ComponentKind::Pypi, "widget", "1.0.0", None)
    }

    #[test]
    fn test_cache_hit_skips_inner_fetch() {
        let cached = CachedFetcher::new(FakeFetcher::new(vec!["1.0.0", "1.1.0"]));
        let c = widget();

        let first = cached.fetch_versions(&c).unwrap();
        let second = cached.fetch_versions(&c).unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner.calls(), 1);
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let cached = CachedFetcher::with_ttl(FakeFetcher::new(vec!["1.0.0"]), Duration::ZERO);
        let c = widget();

        cached.fetch_versions(&c).unwrap();
        cached.fetch_versions(&c).unwrap();
        assert_eq!(cached.inner.calls(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cached = CachedFetcher::new(FakeFetcher::failing());
        let c = widget();

        assert!(cached.fetch_versions(&c).is_err());
        assert!(cached.fetch_versions(&c).is_err());
        assert_eq!(cached.inner.calls(), 2);
    }

    #[test]
    fn test_distinct_components_distinct_entries() {
        let cached = CachedFetcher::new(FakeFetcher::new(vec!["1.0.0"]));
        let a = Component::new(ComponentKind::Pypi, "widget", "1.0.0", None);
        let b = Component::new(ComponentKind::DockerImage, "widget", "1.0.0", Some("acme"));

        cached.fetch_versions(&a).unwrap();
        cached.fetch_versions(&b).unwrap();
        assert_eq!(cached.inner.calls(), 2);
    }
}
