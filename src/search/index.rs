//! Search Index Module
//!
//! Fuzzy module-name search over an immutable snapshot that is rebuilt
//! lazily and swapped whole.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::requests::MAX_MODULE_NAME_LENGTH;
use crate::registry::{Fetched, RegistrySource};

use super::scoring;

/// Default minimum time between two rebuilds
pub const DEFAULT_REFRESH_WINDOW: Duration = Duration::from_secs(2 * 60);

// == Search Hit ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub item: String,
    /// `0` for an exact match, up to `1` for the weakest accepted match
    pub score: f64,
}

/// The preselect candidate of a ranked hit list: the top hit, only when it
/// is an exact match.
pub fn exact_preselect(hits: &[SearchHit]) -> Option<String> {
    hits.first()
        .filter(|hit| hit.score == 0.0)
        .map(|hit| hit.item.clone())
}

// == Index Snapshot ==
/// Module names with their folded forms, never mutated after build.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    names: Vec<String>,
    folded: Vec<Vec<u8>>,
}

impl IndexSnapshot {
    pub fn build(mut names: Vec<String>) -> Self {
        names.sort_unstable();
        names.dedup();
        let folded = names
            .iter()
            .map(|n| n.as_bytes().to_ascii_lowercase())
            .collect();
        Self { names, folded }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Ranked matches for `query`, best first.
    ///
    /// Only the first `MAX_MODULE_NAME_LENGTH` bytes of the query are scored.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query = query.trim().as_bytes();
        let query = query[..query.len().min(MAX_MODULE_NAME_LENGTH)].to_ascii_lowercase();

        let mut hits: Vec<SearchHit> = self
            .folded
            .iter()
            .zip(&self.names)
            .filter_map(|(folded, name)| {
                scoring::score(&query, folded).map(|score| SearchHit {
                    item: name.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.len().cmp(&b.item.len()))
                .then_with(|| a.item.cmp(&b.item))
        });
        hits.truncate(limit);
        hits
    }
}

// == Search Index ==
pub struct SearchIndex {
    source: Arc<dyn RegistrySource>,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    /// Time of the last rebuild attempt; also the single-flight guard
    last_refresh: Mutex<Option<Instant>>,
    refresh_window: Duration,
}

impl SearchIndex {
    /// Creates an index with an empty snapshot. Nothing is fetched until the
    /// first refresh.
    pub fn new(source: Arc<dyn RegistrySource>, refresh_window: Duration) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(IndexSnapshot::default())),
            last_refresh: Mutex::new(None),
            refresh_window,
        }
    }

    pub fn from_config(source: Arc<dyn RegistrySource>, config: &Config) -> Self {
        Self::new(source, Duration::from_secs(config.index_refresh))
    }

    /// The snapshot currently being served.
    pub async fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    // == Refresh ==
    /// Rebuilds the index unless a rebuild was attempted within the refresh
    /// window or is already running. Returns whether a new snapshot was
    /// installed.
    pub async fn refresh(&self) -> bool {
        let Ok(mut last_refresh) = self.last_refresh.try_lock() else {
            debug!("Search index rebuild already running, serving current snapshot");
            return false;
        };

        if let Some(at) = *last_refresh {
            if at.elapsed() < self.refresh_window {
                return false;
            }
        }

        // Stamped before fetching so a failing upstream is retried once per window
        *last_refresh = Some(Instant::now());
        self.rebuild().await
    }

    // == Rebuild ==
    /// Pulls every module name and swaps in a new snapshot. On failure the
    /// current snapshot stays in place.
    pub async fn rebuild(&self) -> bool {
        match self.source.module_names().await {
            Fetched::Found(names) => {
                let snapshot = Arc::new(IndexSnapshot::build(names));
                info!("Search index rebuilt with {} modules", snapshot.len());
                *self.snapshot.write().await = snapshot;
                true
            }
            Fetched::NotFound => {
                warn!("Module list not found upstream, keeping current search index");
                false
            }
            Fetched::Failed(e) => {
                warn!("Module list fetch failed, keeping current search index: {e}");
                false
            }
        }
    }

    // == Search ==
    /// Refreshes if due, then searches the current snapshot.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.refresh().await;
        self.snapshot().await.search(query, limit)
    }
}
