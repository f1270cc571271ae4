use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::upstream::SearchResponse;
use crate::models::{DirectoryMeta, PackageInfo, VersionInfo};

use super::{Fetched, RegistrySource, UpstreamError};

/// Base URLs of the upstream registry services.
#[derive(Debug, Clone)]
pub struct RegistryUrls {
    /// Search and module-list API
    pub api: String,
    /// Static manifest host
    pub cdn: String,
}

impl RegistryUrls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api: config.registry_api_url.trim_end_matches('/').to_string(),
            cdn: config.registry_cdn_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Registry source backed by the registry's public HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: reqwest::Client,
    urls: RegistryUrls,
}

impl HttpRegistry {
    /// Creates a client whose requests all carry `timeout`.
    pub fn new(urls: RegistryUrls, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client, urls })
    }

    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Self::new(
            RegistryUrls::from_config(config),
            Duration::from_secs(config.upstream_timeout),
        )
    }

    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Fetched<T> {
        debug!("Fetching {url}");

        // NOTE: Inner scope so every failure is logged in one place
        let inner: Result<Option<T>, UpstreamError> = async {
            let response = self.client.get(url).query(query).send().await?;
            match response.status() {
                StatusCode::NOT_FOUND => return Ok(None),
                status if !status.is_success() => {
                    return Err(UpstreamError::Status(status.as_u16()))
                }
                _ => {}
            }
            let bytes = response.bytes().await?;
            Ok::<_, UpstreamError>(Some(serde_json::from_slice::<T>(&bytes)?))
        }
        .await;

        match inner {
            Ok(Some(value)) => Fetched::Found(value),
            Ok(None) => {
                debug!("Upstream 404 for {url}");
                Fetched::NotFound
            }
            Err(e) => {
                warn!("Upstream request to {url} failed: {e}");
                Fetched::Failed(e)
            }
        }
    }
}

#[async_trait]
impl RegistrySource for HttpRegistry {
    async fn search_modules(&self, query: Option<&str>, limit: usize) -> Fetched<Vec<PackageInfo>> {
        let url = format!("{}/modules", self.urls.api);
        let mut params = vec![("limit", limit.to_string())];
        match query {
            Some(q) => params.push(("query", q.to_string())),
            None => params.push(("sort", "stars".to_string())),
        }
        self.get_json::<SearchResponse>(&url, &params)
            .await
            .map(SearchResponse::into_results)
    }

    async fn module_names(&self) -> Fetched<Vec<String>> {
        let url = format!("{}/modules", self.urls.api);
        self.get_json(&url, &[("simple", "1".to_string())]).await
    }

    async fn version_manifest(&self, module: &str) -> Fetched<VersionInfo> {
        let url = format!("{}/{module}/meta/versions.json", self.urls.cdn);
        self.get_json(&url, &[]).await
    }

    async fn directory_manifest(&self, module: &str, version: &str) -> Fetched<DirectoryMeta> {
        let url = format!("{}/{module}/versions/{version}/meta/meta.json", self.urls.cdn);
        self.get_json(&url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_trim_trailing_slash() {
        let config = Config {
            registry_api_url: "https://api.example.test/".to_string(),
            registry_cdn_url: "https://cdn.example.test//".to_string(),
            ..Config::default()
        };
        let urls = RegistryUrls::from_config(&config);
        assert_eq!(urls.api, "https://api.example.test");
        assert_eq!(urls.cdn, "https://cdn.example.test");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_a_failure() {
        let urls = RegistryUrls {
            api: "http://127.0.0.1:9".to_string(),
            cdn: "http://127.0.0.1:9".to_string(),
        };
        let registry = HttpRegistry::new(urls, Duration::from_millis(500)).unwrap();
        let outcome = registry.version_manifest("oak").await;
        assert!(matches!(outcome, Fetched::Failed(UpstreamError::Transport(_))));
    }
}
