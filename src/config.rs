//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Search and module-list API base URL
    pub registry_api_url: String,
    /// Manifest CDN base URL
    pub registry_cdn_url: String,
    /// Public registry site, used in blurb links
    pub registry_site_url: String,
    /// Documentation site, used in blurb links
    pub registry_docs_url: String,
    /// Timeout in seconds for each upstream request
    pub upstream_timeout: u64,
    /// Seconds between bulk invalidations of the version store
    pub version_ttl: u64,
    /// Minimum seconds between search index rebuilds
    pub index_refresh: u64,
    /// Number of modules listed when no search query is given
    pub popular_limit: usize,
    /// Maximum number of search results
    pub search_limit: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REGISTRY_API_URL` - Search API (default: https://api.deno.land)
    /// - `REGISTRY_CDN_URL` - Manifest CDN (default: https://cdn.deno.land)
    /// - `REGISTRY_SITE_URL` - Public site (default: https://deno.land)
    /// - `REGISTRY_DOCS_URL` - Documentation site (default: https://doc.deno.land)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    /// - `VERSION_TTL_SECS` - Version store freshness window (default: 300)
    /// - `INDEX_REFRESH_SECS` - Search index rebuild window (default: 120)
    /// - `POPULAR_LIMIT` - Modules listed for an empty query (default: 50)
    /// - `SEARCH_LIMIT` - Maximum search results (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            registry_api_url: string_var("REGISTRY_API_URL", defaults.registry_api_url),
            registry_cdn_url: string_var("REGISTRY_CDN_URL", defaults.registry_cdn_url),
            registry_site_url: string_var("REGISTRY_SITE_URL", defaults.registry_site_url),
            registry_docs_url: string_var("REGISTRY_DOCS_URL", defaults.registry_docs_url),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            version_ttl: parse_var("VERSION_TTL_SECS", defaults.version_ttl),
            index_refresh: parse_var("INDEX_REFRESH_SECS", defaults.index_refresh),
            popular_limit: parse_var("POPULAR_LIMIT", defaults.popular_limit),
            search_limit: parse_var("SEARCH_LIMIT", defaults.search_limit),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn string_var(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            registry_api_url: "https://api.deno.land".to_string(),
            registry_cdn_url: "https://cdn.deno.land".to_string(),
            registry_site_url: "https://deno.land".to_string(),
            registry_docs_url: "https://doc.deno.land".to_string(),
            upstream_timeout: 10,
            version_ttl: 300,
            index_refresh: 120,
            popular_limit: 50,
            search_limit: 100,
        }
    }
}
