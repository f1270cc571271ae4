use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;

use crate::models::{DirectoryMeta, PackageInfo, VersionInfo};

use super::{Fetched, RegistrySource, UpstreamError};

/// Number of upstream calls served per endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CallCounts {
    pub search: u64,
    pub module_names: u64,
    pub versions: u64,
    pub directories: u64,
}

/// In-memory registry used by tests and local development.
///
/// Unknown modules and versions answer `NotFound`. While
/// [`MemoryRegistry::set_failing`] is on, every call fails with a 503.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    packages: Vec<PackageInfo>,
    versions: HashMap<String, VersionInfo>,
    directories: HashMap<(String, String), DirectoryMeta>,
    failing: AtomicBool,
    search_calls: AtomicU64,
    name_calls: AtomicU64,
    version_calls: AtomicU64,
    directory_calls: AtomicU64,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, info: PackageInfo) -> Self {
        self.packages.push(info);
        self
    }

    pub fn with_versions(mut self, module: &str, info: VersionInfo) -> Self {
        self.versions.insert(module.to_string(), info);
        self
    }

    pub fn with_directory(mut self, module: &str, version: &str, meta: DirectoryMeta) -> Self {
        self.directories
            .insert((module.to_string(), version.to_string()), meta);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            search: self.search_calls.load(Ordering::SeqCst),
            module_names: self.name_calls.load(Ordering::SeqCst),
            versions: self.version_calls.load(Ordering::SeqCst),
            directories: self.directory_calls.load(Ordering::SeqCst),
        }
    }

    fn outage<T>(&self) -> Option<Fetched<T>> {
        self.failing
            .load(Ordering::SeqCst)
            .then(|| Fetched::Failed(UpstreamError::Status(503)))
    }
}

#[async_trait]
impl RegistrySource for MemoryRegistry {
    async fn search_modules(&self, query: Option<&str>, limit: usize) -> Fetched<Vec<PackageInfo>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(outage) = self.outage() {
            return outage;
        }

        let mut results: Vec<PackageInfo> = match query {
            Some(q) => {
                let q = q.to_ascii_lowercase();
                self.packages
                    .iter()
                    .filter(|p| p.name.to_ascii_lowercase().contains(&q))
                    .cloned()
                    .collect()
            }
            None => {
                let mut all = self.packages.clone();
                all.sort_by(|a, b| b.star_count.cmp(&a.star_count));
                all
            }
        };
        results.truncate(limit);
        Fetched::Found(results)
    }

    async fn module_names(&self) -> Fetched<Vec<String>> {
        self.name_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(outage) = self.outage() {
            return outage;
        }
        Fetched::Found(self.packages.iter().map(|p| p.name.clone()).collect())
    }

    async fn version_manifest(&self, module: &str) -> Fetched<VersionInfo> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(outage) = self.outage() {
            return outage;
        }
        match self.versions.get(module) {
            Some(info) => Fetched::Found(info.clone()),
            None => Fetched::NotFound,
        }
    }

    async fn directory_manifest(&self, module: &str, version: &str) -> Fetched<DirectoryMeta> {
        self.directory_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(outage) = self.outage() {
            return outage;
        }
        match self
            .directories
            .get(&(module.to_string(), version.to_string()))
        {
            Some(meta) => Fetched::Found(meta.clone()),
            None => Fetched::NotFound,
        }
    }
}
