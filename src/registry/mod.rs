//! Registry Source Module
//!
//! The upstream providers consumed by the cache layer: module search,
//! per-module version manifests and per-version directory manifests.

mod error;
mod http;
mod memory;

use async_trait::async_trait;

use crate::models::{DirectoryMeta, PackageInfo, VersionInfo};

pub use error::UpstreamError;
pub use http::{HttpRegistry, RegistryUrls};
pub use memory::{CallCounts, MemoryRegistry};

// == Fetch Outcome ==
/// Outcome of a single upstream request.
#[derive(Debug)]
pub enum Fetched<T> {
    Found(T),
    /// The registry answered that the subject does not exist
    NotFound,
    Failed(UpstreamError),
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Found(value) => Fetched::Found(f(value)),
            Fetched::NotFound => Fetched::NotFound,
            Fetched::Failed(e) => Fetched::Failed(e),
        }
    }
}

// == Registry Source Trait ==
/// Upstream registry providers.
///
/// Each call makes exactly one upstream attempt. Implementations report
/// failures through [`Fetched`] instead of erroring, leaving the caching
/// decision to the caller.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Searches modules by name. `None` lists modules ordered by stars.
    async fn search_modules(&self, query: Option<&str>, limit: usize) -> Fetched<Vec<PackageInfo>>;

    /// Every module name known to the registry.
    async fn module_names(&self) -> Fetched<Vec<String>>;

    async fn version_manifest(&self, module: &str) -> Fetched<VersionInfo>;

    async fn directory_manifest(&self, module: &str, version: &str) -> Fetched<DirectoryMeta>;
}
