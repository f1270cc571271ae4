//! Upstream registry payloads
//!
//! Typed schemas for the three registry providers. Missing or differently
//! cased fields are defaulted here so the rest of the crate never has to
//! check for optional values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// == Package Info ==
/// A module as described by the search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "starCount", alias = "star_count", default)]
    pub star_count: u64,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>, star_count: u64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            star_count,
        }
    }
}

/// Search API response. The registry wraps results in an envelope, older
/// mirrors return a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Envelope { data: SearchData },
    Bare(Vec<PackageInfo>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub results: Vec<PackageInfo>,
}

impl SearchResponse {
    pub fn into_results(self) -> Vec<PackageInfo> {
        match self {
            SearchResponse::Envelope { data } => data.results,
            SearchResponse::Bare(results) => results,
        }
    }
}

// == Version Info ==
/// Published versions of a module, newest first as the manifest lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    /// Latest version, empty when the module is unknown
    pub latest: String,
    pub versions: Vec<String>,
}

#[derive(Deserialize)]
struct RawVersionManifest {
    #[serde(default, deserialize_with = "null_as_default")]
    latest: String,
    #[serde(default)]
    versions: Vec<String>,
}

impl<'de> Deserialize<'de> for VersionInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawVersionManifest::deserialize(deserializer)?;
        Ok(VersionInfo::new(raw.latest, raw.versions))
    }
}

impl VersionInfo {
    /// Builds a version info, keeping `versions` non-empty whenever
    /// `latest` is set.
    pub fn new(latest: impl Into<String>, mut versions: Vec<String>) -> Self {
        let latest = latest.into();
        if versions.is_empty() && !latest.is_empty() {
            versions.push(latest.clone());
        }
        Self { latest, versions }
    }

    /// The sentinel stored for unknown modules and failed fetches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty() && self.versions.is_empty()
    }
}

// == Directory Listing ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a published version's flat directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// Absolute path, always starting with `/`
    pub path: String,
    pub size: u64,
    pub kind: EntryKind,
}

#[derive(Deserialize)]
struct RawListingEntry {
    path: String,
    #[serde(default)]
    size: u64,
    #[serde(alias = "type")]
    kind: EntryKind,
}

impl<'de> Deserialize<'de> for ListingEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawListingEntry::deserialize(deserializer)?;
        Ok(ListingEntry::new(raw.path, raw.size, raw.kind))
    }
}

impl ListingEntry {
    pub fn new(path: impl Into<String>, size: u64, kind: EntryKind) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self { path, size, kind }
    }

    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self::new(path, size, EntryKind::File)
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path, 0, EntryKind::Dir)
    }
}

/// Directory manifest of one published version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMeta {
    #[serde(rename = "uploadedAt", alias = "uploaded_at", default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(rename = "directoryListing", alias = "directory_listing", default)]
    pub listing: Vec<ListingEntry>,
}

impl DirectoryMeta {
    pub fn new(uploaded_at: Option<DateTime<Utc>>, listing: Vec<ListingEntry>) -> Self {
        Self {
            uploaded_at,
            listing,
        }
    }

    /// The sentinel stored for unknown versions and failed fetches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }

    /// Looks up an entry by absolute or relative path.
    pub fn entry(&self, path: &str) -> Option<&ListingEntry> {
        let wanted = path.trim_start_matches('/').trim_end_matches('/');
        self.listing
            .iter()
            .find(|e| e.path.trim_start_matches('/') == wanted)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_envelope_with_snake_case_fields() {
        let json = r#"{"success":true,"data":{"total_count":1,"results":[
            {"name":"oak","description":"A middleware framework","star_count":4200}
        ]}}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        let results = resp.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "oak");
        assert_eq!(results[0].star_count, 4200);
    }

    #[test]
    fn test_search_bare_array_with_missing_fields() {
        let json = r#"[{"name":"fresh","starCount":10},{"name":"lume","description":null}]"#;
        let results = serde_json::from_str::<SearchResponse>(json)
            .unwrap()
            .into_results();
        assert_eq!(results[0].star_count, 10);
        assert_eq!(results[0].description, "");
        assert_eq!(results[1].star_count, 0);
    }

    #[test]
    fn test_version_manifest_defaults() {
        let info: VersionInfo = serde_json::from_str(r#"{"latest":null}"#).unwrap();
        assert!(info.is_empty());

        let info: VersionInfo = serde_json::from_str(r#"{"latest":"v1.0.0"}"#).unwrap();
        assert_eq!(info.versions, vec!["v1.0.0".to_string()]);
    }

    #[test]
    fn test_directory_manifest_normalizes_paths() {
        let json = r#"{
            "uploaded_at": "2024-01-02T03:04:05.000Z",
            "directory_listing": [
                {"path": "", "size": 0, "type": "dir"},
                {"path": "mod.ts", "size": 12, "type": "file"}
            ]
        }"#;
        let meta: DirectoryMeta = serde_json::from_str(json).unwrap();
        assert!(meta.uploaded_at.is_some());
        assert_eq!(meta.listing[0].path, "/");
        assert_eq!(meta.listing[1].path, "/mod.ts");
        assert_eq!(meta.listing[1].kind, EntryKind::File);
    }

    #[test]
    fn test_directory_entry_lookup() {
        let meta = DirectoryMeta::new(None, vec![ListingEntry::dir("/src")]);
        assert!(meta.entry("src/").is_some());
        assert!(meta.entry("/src").is_some());
        assert!(meta.entry("lib").is_none());
    }
}
