//! Metadata Cache Module
//!
//! The three registry metadata stores and their staleness policies:
//!
//! | Store | Key | Policy |
//! |-------|-----|--------|
//! | packages | module | never expires |
//! | versions | module | whole store cleared once per freshness window |
//! | directories | (module, version) | never expires, versions are immutable |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{MetadataStore, StoreStatsSnapshot};
use crate::config::Config;
use crate::models::{DirectoryMeta, PackageInfo, VersionInfo, LATEST_ALIAS};
use crate::registry::{Fetched, RegistrySource};

/// Default freshness window of the version store
pub const DEFAULT_VERSION_TTL: Duration = Duration::from_secs(5 * 60);

/// Default number of search results requested per package lookup
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

// == Metadata Cache ==
pub struct MetadataCache {
    source: Arc<dyn RegistrySource>,
    /// `None` marks a module the search API does not know
    packages: MetadataStore<String, Option<PackageInfo>>,
    versions: MetadataStore<String, VersionInfo>,
    directories: MetadataStore<(String, String), DirectoryMeta>,
    version_ttl: Duration,
    /// Held while checking and clearing the version store
    last_version_clear: Mutex<Instant>,
    search_limit: usize,
}

/// Stats of all three stores.
#[derive(Debug, Clone, Copy)]
pub struct MetadataStats {
    pub packages: StoreStatsSnapshot,
    pub versions: StoreStatsSnapshot,
    pub directories: StoreStatsSnapshot,
}

impl MetadataCache {
    // == Constructor ==
    pub fn new(source: Arc<dyn RegistrySource>, version_ttl: Duration, search_limit: usize) -> Self {
        Self {
            source,
            packages: MetadataStore::new("package"),
            versions: MetadataStore::new("version"),
            directories: MetadataStore::new("directory"),
            version_ttl,
            last_version_clear: Mutex::new(Instant::now()),
            search_limit,
        }
    }

    pub fn from_config(source: Arc<dyn RegistrySource>, config: &Config) -> Self {
        Self::new(
            source,
            Duration::from_secs(config.version_ttl),
            config.search_limit,
        )
    }

    // == Version Info ==
    /// Cached version manifest of `module`.
    ///
    /// Unknown modules and failed fetches are remembered as an empty info
    /// until the next bulk clear.
    pub async fn get_or_fetch_version_info(&self, module: &str) -> Arc<VersionInfo> {
        self.expire_versions_if_stale().await;

        self.versions
            .get_or_fetch(
                module.to_string(),
                || self.source.version_manifest(module),
                VersionInfo::empty,
            )
            .await
    }

    /// Clears the whole version store once its window has passed.
    async fn expire_versions_if_stale(&self) {
        let mut last_clear = self.last_version_clear.lock().await;
        if last_clear.elapsed() > self.version_ttl {
            let removed = self.versions.clear().await;
            *last_clear = Instant::now();
            debug!("Version store expired, dropped {removed} entries");
        }
    }

    /// Resolves the `_latest` alias to a concrete version.
    ///
    /// Returns `None` when the alias is used on a module without versions.
    pub async fn resolve_version(&self, module: &str, version: &str) -> Option<String> {
        if version != LATEST_ALIAS {
            return Some(version.to_string());
        }
        let info = self.get_or_fetch_version_info(module).await;
        (!info.latest.is_empty()).then(|| info.latest.clone())
    }

    // == Directory Meta ==
    /// Cached directory manifest of a published version.
    pub async fn get_or_fetch_directory_meta(&self, module: &str, version: &str) -> Arc<DirectoryMeta> {
        self.directories
            .get_or_fetch(
                (module.to_string(), version.to_string()),
                || self.source.directory_manifest(module, version),
                DirectoryMeta::empty,
            )
            .await
    }

    // == Package Info ==
    /// Cached search-API record of `module`.
    ///
    /// A miss queries the search API by name and warms the store with every
    /// returned record, not only the requested one.
    pub async fn get_or_fetch_package_info(&self, module: &str) -> Arc<Option<PackageInfo>> {
        let key = module.to_string();
        if let Some(info) = self.packages.lookup(&key).await {
            return info;
        }

        let exact = match self.source.search_modules(Some(module), self.search_limit).await {
            Fetched::Found(records) => {
                let exact = records.iter().find(|r| r.name == module).cloned();
                self.warm_package_infos(records).await;
                exact
            }
            Fetched::NotFound => None,
            Fetched::Failed(e) => {
                self.packages.record_upstream_failure();
                warn!("package search failed for {module:?}, caching empty value: {e}");
                None
            }
        };

        self.packages.insert(key, exact).await
    }

    /// Bulk-inserts search records as package infos.
    pub async fn warm_package_infos(&self, records: Vec<PackageInfo>) -> usize {
        let warmed = self
            .packages
            .insert_many(records.into_iter().map(|r| (r.name.clone(), Some(r))))
            .await;
        debug!("Warmed {warmed} package entries");
        warmed
    }

    // == Popular Packages ==
    /// Top modules by stars. Fetched on every call; the records warm the
    /// package store. Failures yield an empty list.
    pub async fn popular_packages(&self, limit: usize) -> Vec<PackageInfo> {
        match self.source.search_modules(None, limit).await {
            Fetched::Found(records) => {
                self.warm_package_infos(records.clone()).await;
                records
            }
            Fetched::NotFound => Vec::new(),
            Fetched::Failed(e) => {
                self.packages.record_upstream_failure();
                warn!("popular module listing failed: {e}");
                Vec::new()
            }
        }
    }

    // == Stats ==
    pub async fn stats(&self) -> MetadataStats {
        MetadataStats {
            packages: self.packages.stats().await,
            versions: self.versions.stats().await,
            directories: self.directories.stats().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingEntry;
    use crate::registry::MemoryRegistry;

    fn registry() -> Arc<MemoryRegistry> {
        Arc::new(
            MemoryRegistry::new()
                .with_package(PackageInfo::new("oak", "Middleware framework", 5000))
                .with_package(PackageInfo::new("oak_cors", "CORS for oak", 30))
                .with_versions(
                    "oak",
                    VersionInfo::new("v12.0.0", vec!["v12.0.0".into(), "v11.1.0".into()]),
                )
                .with_directory(
                    "oak",
                    "v12.0.0",
                    DirectoryMeta::new(None, vec![ListingEntry::file("/mod.ts", 120)]),
                ),
        )
    }

    fn cache(registry: &Arc<MemoryRegistry>) -> MetadataCache {
        MetadataCache::new(registry.clone(), DEFAULT_VERSION_TTL, DEFAULT_SEARCH_LIMIT)
    }

    #[tokio::test]
    async fn test_version_info_is_cached() {
        let registry = registry();
        let cache = cache(&registry);

        let first = cache.get_or_fetch_version_info("oak").await;
        let second = cache.get_or_fetch_version_info("oak").await;

        assert_eq!(first.latest, "v12.0.0");
        assert_eq!(first, second);
        assert_eq!(registry.calls().versions, 1);
    }

    #[tokio::test]
    async fn test_unknown_module_is_remembered_as_empty() {
        let registry = registry();
        let cache = cache(&registry);

        let first = cache.get_or_fetch_version_info("unpublished").await;
        let second = cache.get_or_fetch_version_info("unpublished").await;

        assert!(first.is_empty());
        assert!(second.is_empty());
        assert_eq!(registry.calls().versions, 1);
    }

    #[tokio::test]
    async fn test_upstream_outage_is_remembered_as_empty() {
        let registry = registry();
        registry.set_failing(true);
        let cache = cache(&registry);

        assert!(cache.get_or_fetch_version_info("oak").await.is_empty());
        registry.set_failing(false);
        assert!(cache.get_or_fetch_version_info("oak").await.is_empty());

        assert_eq!(registry.calls().versions, 1);
        assert_eq!(cache.stats().await.versions.upstream_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_version_store_freshness_boundary() {
        let registry = registry();
        let cache = cache(&registry);

        cache.get_or_fetch_version_info("oak").await;
        assert_eq!(registry.calls().versions, 1);

        tokio::time::advance(Duration::from_secs(299)).await;
        cache.get_or_fetch_version_info("oak").await;
        assert_eq!(registry.calls().versions, 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.get_or_fetch_version_info("oak").await;
        assert_eq!(registry.calls().versions, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_version_store_clears_every_module_together() {
        let registry = registry();
        let cache = cache(&registry);

        cache.get_or_fetch_version_info("oak").await;
        tokio::time::advance(Duration::from_secs(200)).await;
        cache.get_or_fetch_version_info("unpublished").await;
        assert_eq!(registry.calls().versions, 2);

        // The younger entry goes with the older one
        tokio::time::advance(Duration::from_secs(101)).await;
        cache.get_or_fetch_version_info("unpublished").await;
        cache.get_or_fetch_version_info("oak").await;
        assert_eq!(registry.calls().versions, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_directory_meta_never_expires() {
        let registry = registry();
        let cache = cache(&registry);

        let first = cache.get_or_fetch_directory_meta("oak", "v12.0.0").await;
        tokio::time::advance(Duration::from_secs(24 * 60 * 60)).await;
        let second = cache.get_or_fetch_directory_meta("oak", "v12.0.0").await;

        assert_eq!(first.listing.len(), 1);
        assert_eq!(first, second);
        assert_eq!(registry.calls().directories, 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_cached_empty() {
        let registry = registry();
        let cache = cache(&registry);

        assert!(cache.get_or_fetch_directory_meta("oak", "v0.0.1").await.is_empty());
        assert!(cache.get_or_fetch_directory_meta("oak", "v0.0.1").await.is_empty());
        assert_eq!(registry.calls().directories, 1);
    }

    #[tokio::test]
    async fn test_package_lookup_warms_related_entries() {
        let registry = registry();
        let cache = cache(&registry);

        let oak = cache.get_or_fetch_package_info("oak").await;
        assert_eq!(Option::as_ref(&oak).map(|p| p.star_count), Some(5000));

        // Returned by the same search, so no second upstream call
        let cors = cache.get_or_fetch_package_info("oak_cors").await;
        assert_eq!(Option::as_ref(&cors).map(|p| p.name.as_str()), Some("oak_cors"));
        assert_eq!(registry.calls().search, 1);
    }

    #[tokio::test]
    async fn test_warmed_entries_match_fetched_entries() {
        let registry = registry();

        let fetched = cache(&registry).get_or_fetch_package_info("oak").await;

        let warmed_cache = cache(&registry);
        warmed_cache.popular_packages(10).await;
        let warmed = warmed_cache.get_or_fetch_package_info("oak").await;

        assert_eq!(fetched, warmed);
    }

    #[tokio::test]
    async fn test_unknown_package_is_cached_as_absent() {
        let registry = registry();
        let cache = cache(&registry);

        assert!(cache.get_or_fetch_package_info("nothing").await.is_none());
        assert!(cache.get_or_fetch_package_info("nothing").await.is_none());
        assert_eq!(registry.calls().search, 1);
    }

    #[tokio::test]
    async fn test_resolve_latest_alias() {
        let registry = registry();
        let cache = cache(&registry);

        assert_eq!(
            cache.resolve_version("oak", LATEST_ALIAS).await.as_deref(),
            Some("v12.0.0")
        );
        assert_eq!(
            cache.resolve_version("oak", "v11.1.0").await.as_deref(),
            Some("v11.1.0")
        );
        assert_eq!(cache.resolve_version("unpublished", LATEST_ALIAS).await, None);
    }
}
