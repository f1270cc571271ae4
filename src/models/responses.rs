//! Response DTOs for the completion API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::StoreStatsSnapshot;

/// Completion list returned by every `/api/x` and `/api/std` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionList {
    /// Suggested items in display order
    pub items: Vec<String>,
    /// Whether the client should re-query as the user keeps typing
    pub is_incomplete: bool,
    /// The item the client should select by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preselect: Option<String>,
}

impl CompletionList {
    /// Creates a complete list without a preselected item
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            is_incomplete: false,
            preselect: None,
        }
    }

    pub fn incomplete(mut self) -> Self {
        self.is_incomplete = true;
        self
    }

    pub fn with_preselect(mut self, preselect: Option<String>) -> Self {
        self.preselect = preselect;
        self
    }
}

/// Markdown blurb returned by the `/api/details` routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownDetails {
    /// Always "markdown"
    pub kind: &'static str,
    pub value: String,
}

impl MarkdownDetails {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            kind: "markdown",
            value: value.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub packages: StoreStatsSnapshot,
    pub versions: StoreStatsSnapshot,
    pub directories: StoreStatsSnapshot,
    /// Number of module names in the current search snapshot
    pub indexed_modules: usize,
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
