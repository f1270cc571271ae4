//! API Handlers
//!
//! HTTP request handlers for the completion and details endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    Json,
};
use tracing::debug;

use crate::cache::MetadataCache;
use crate::completion::{filter_versions, preselect, resolve_completions};
use crate::config::Config;
use crate::details::{package_details, path_details, version_details, SiteLinks};
use crate::error::{ApiError, Result};
use crate::models::{
    normalize_typed_path, CompletionList, DirectoryMeta, HealthResponse, MarkdownDetails,
    ModuleName, StatsResponse, LATEST_ALIAS,
};
use crate::registry::{HttpRegistry, RegistrySource};
use crate::search::{exact_preselect, SearchIndex};

/// Application state shared across all handlers.
///
/// One cache and one search index per process, injected here rather than
/// held in globals so tests can build isolated instances.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<MetadataCache>,
    pub index: Arc<SearchIndex>,
    pub links: Arc<SiteLinks>,
    /// Modules listed for an empty search
    pub popular_limit: usize,
    /// Maximum search results
    pub search_limit: usize,
}

impl AppState {
    /// Creates a new AppState over the given registry source.
    pub fn new(source: Arc<dyn RegistrySource>, config: &Config) -> Self {
        Self {
            cache: Arc::new(MetadataCache::from_config(source.clone(), config)),
            index: Arc::new(SearchIndex::from_config(source, config)),
            links: Arc::new(SiteLinks::from_config(config)),
            popular_limit: config.popular_limit,
            search_limit: config.search_limit,
        }
    }

    /// Creates a new AppState talking to the configured HTTP registry.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = HttpRegistry::from_config(config)
            .map_err(|e| ApiError::Internal(format!("Failed to build registry client: {e}")))?;
        Ok(Self::new(Arc::new(registry), config))
    }
}

// == Cache-Control Bands ==
/// How long clients and proxies may reuse a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBand {
    /// Search and version listings
    Short,
    /// Package blurbs
    Medium,
    /// Anything keyed by an exact published version
    Immutable,
}

impl CacheBand {
    pub fn header_value(self) -> &'static str {
        match self {
            CacheBand::Short => "public, max-age=3600",
            CacheBand::Medium => "public, max-age=86400",
            CacheBand::Immutable => "public, max-age=31536000, immutable",
        }
    }

    /// Immutable for a concrete version with a known listing, short
    /// otherwise so a late publish or an outage is not pinned.
    fn for_version(requested: &str, meta: &DirectoryMeta) -> Self {
        if requested == LATEST_ALIAS || meta.is_empty() {
            CacheBand::Short
        } else {
            CacheBand::Immutable
        }
    }
}

/// JSON body with a Cache-Control header.
pub type Cached<T> = ([(header::HeaderName, &'static str); 1], Json<T>);

fn cached<T>(band: CacheBand, body: T) -> Cached<T> {
    ([(header::CACHE_CONTROL, band.header_value())], Json(body))
}

// == Shared Completion Logic ==
async fn complete_versions(state: &AppState, module: &ModuleName, prefix: &str) -> CompletionList {
    let info = state.cache.get_or_fetch_version_info(module.as_str()).await;
    let items: Vec<String> = filter_versions(&info.versions, prefix)
        .into_iter()
        .map(str::to_string)
        .collect();
    let latest = items.iter().find(|v| **v == info.latest).cloned();

    CompletionList::new(items).with_preselect(latest)
}

async fn complete_path(
    state: &AppState,
    module: &ModuleName,
    version: &str,
    path: &str,
) -> Cached<CompletionList> {
    let Some(resolved) = state.cache.resolve_version(module.as_str(), version).await else {
        debug!("No latest version for {module}, returning no paths");
        return cached(CacheBand::Short, CompletionList::new(Vec::new()));
    };

    let meta = state
        .cache
        .get_or_fetch_directory_meta(module.as_str(), &resolved)
        .await;
    let current_path = normalize_typed_path(path);
    let items = resolve_completions(&meta.listing, &current_path);
    let selected = preselect(&items);

    cached(
        CacheBand::for_version(version, &meta),
        CompletionList::new(items).with_preselect(selected),
    )
}

async fn describe_version(
    state: &AppState,
    module: &ModuleName,
    version: &str,
    path: Option<&str>,
) -> Cached<MarkdownDetails> {
    let (resolved, meta) = match state.cache.resolve_version(module.as_str(), version).await {
        Some(resolved) => {
            let meta = state
                .cache
                .get_or_fetch_directory_meta(module.as_str(), &resolved)
                .await;
            (resolved, meta)
        }
        None => {
            debug!("No latest version for {module}, describing without a listing");
            (version.to_string(), Arc::new(DirectoryMeta::empty()))
        }
    };
    let band = CacheBand::for_version(version, &meta);

    match path.map(normalize_typed_path).filter(|p| !p.is_empty()) {
        Some(path) => {
            let value = path_details(module, &resolved, &path, &meta, &state.links);
            cached(band, MarkdownDetails::new(value))
        }
        None => {
            let info = if module.is_std() {
                None
            } else {
                (*state.cache.get_or_fetch_package_info(module.as_str()).await).clone()
            };
            let value = version_details(
                module,
                &resolved,
                info.as_ref(),
                &meta,
                &state.links,
                chrono::Utc::now(),
            );
            // The publish time is rendered relative to now
            let band = match band {
                CacheBand::Immutable => CacheBand::Medium,
                other => other,
            };
            cached(band, MarkdownDetails::new(value))
        }
    }
}

// == Module Search ==
/// Handler for GET /api/x
///
/// Lists the most starred modules.
pub async fn popular_handler(State(state): State<AppState>) -> Cached<CompletionList> {
    let items = state
        .cache
        .popular_packages(state.popular_limit)
        .await
        .into_iter()
        .map(|p| p.name)
        .collect();

    cached(CacheBand::Short, CompletionList::new(items).incomplete())
}

/// Handler for GET /api/x/:pkg
///
/// Fuzzy-searches module names, preselecting only an exact match.
pub async fn search_handler(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Cached<CompletionList> {
    let hits = state.index.search(&query, state.search_limit).await;
    let selected = exact_preselect(&hits);
    let items = hits.into_iter().map(|h| h.item).collect();

    cached(
        CacheBand::Short,
        CompletionList::new(items).incomplete().with_preselect(selected),
    )
}

// == Versions ==
/// Handler for GET /api/x/:pkg/
pub async fn versions_handler(
    State(state): State<AppState>,
    Path(pkg): Path<String>,
) -> Result<Cached<CompletionList>> {
    let module = ModuleName::parse(&pkg)?;
    Ok(cached(CacheBand::Short, complete_versions(&state, &module, "").await))
}

/// Handler for GET /api/x/:pkg/:ver
pub async fn versions_prefix_handler(
    State(state): State<AppState>,
    Path((pkg, ver)): Path<(String, String)>,
) -> Result<Cached<CompletionList>> {
    let module = ModuleName::parse(&pkg)?;
    Ok(cached(CacheBand::Short, complete_versions(&state, &module, &ver).await))
}

/// Handler for GET /api/std and GET /api/std/
pub async fn std_versions_handler(State(state): State<AppState>) -> Cached<CompletionList> {
    cached(
        CacheBand::Short,
        complete_versions(&state, &ModuleName::std(), "").await,
    )
}

/// Handler for GET /api/std/:ver
pub async fn std_versions_prefix_handler(
    State(state): State<AppState>,
    Path(ver): Path<String>,
) -> Cached<CompletionList> {
    cached(
        CacheBand::Short,
        complete_versions(&state, &ModuleName::std(), &ver).await,
    )
}

// == Paths ==
/// Handler for GET /api/x/:pkg/:ver/
pub async fn root_path_handler(
    State(state): State<AppState>,
    Path((pkg, ver)): Path<(String, String)>,
) -> Result<Cached<CompletionList>> {
    let module = ModuleName::parse(&pkg)?;
    Ok(complete_path(&state, &module, &ver, "").await)
}

/// Handler for GET /api/x/:pkg/:ver/*path
pub async fn path_handler(
    State(state): State<AppState>,
    Path((pkg, ver, path)): Path<(String, String, String)>,
) -> Result<Cached<CompletionList>> {
    let module = ModuleName::parse(&pkg)?;
    Ok(complete_path(&state, &module, &ver, &path).await)
}

/// Handler for GET /api/std/:ver/
pub async fn std_root_path_handler(
    State(state): State<AppState>,
    Path(ver): Path<String>,
) -> Cached<CompletionList> {
    complete_path(&state, &ModuleName::std(), &ver, "").await
}

/// Handler for GET /api/std/:ver/*path
pub async fn std_path_handler(
    State(state): State<AppState>,
    Path((ver, path)): Path<(String, String)>,
) -> Cached<CompletionList> {
    complete_path(&state, &ModuleName::std(), &ver, &path).await
}

// == Details ==
/// Handler for GET /api/details/x/:pkg
pub async fn package_details_handler(
    State(state): State<AppState>,
    Path(pkg): Path<String>,
) -> Result<Cached<MarkdownDetails>> {
    let module = ModuleName::parse(&pkg)?;
    let info = state.cache.get_or_fetch_package_info(module.as_str()).await;
    let value = package_details(&module, Option::as_ref(&info), &state.links);
    Ok(cached(CacheBand::Medium, MarkdownDetails::new(value)))
}

/// Handler for GET /api/details/x/:pkg/:ver
pub async fn version_details_handler(
    State(state): State<AppState>,
    Path((pkg, ver)): Path<(String, String)>,
) -> Result<Cached<MarkdownDetails>> {
    let module = ModuleName::parse(&pkg)?;
    Ok(describe_version(&state, &module, &ver, None).await)
}

/// Handler for GET /api/details/x/:pkg/:ver/*path
pub async fn path_details_handler(
    State(state): State<AppState>,
    Path((pkg, ver, path)): Path<(String, String, String)>,
) -> Result<Cached<MarkdownDetails>> {
    let module = ModuleName::parse(&pkg)?;
    Ok(describe_version(&state, &module, &ver, Some(&path)).await)
}

/// Handler for GET /api/details/std/:ver
pub async fn std_version_details_handler(
    State(state): State<AppState>,
    Path(ver): Path<String>,
) -> Cached<MarkdownDetails> {
    describe_version(&state, &ModuleName::std(), &ver, None).await
}

/// Handler for GET /api/details/std/:ver/*path
pub async fn std_path_details_handler(
    State(state): State<AppState>,
    Path((ver, path)): Path<(String, String)>,
) -> Cached<MarkdownDetails> {
    describe_version(&state, &ModuleName::std(), &ver, Some(&path)).await
}

// == Service ==
/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    let indexed_modules = state.index.snapshot().await.len();

    Json(StatsResponse {
        packages: stats.packages,
        versions: stats.versions,
        directories: stats.directories,
        indexed_modules,
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
