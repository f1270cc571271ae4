//! Detail Formatter
//!
//! Pure functions rendering cached metadata as short markdown blurbs. They
//! never touch the network or the caches; callers pass in everything,
//! including the current time.

use chrono::{DateTime, Utc};

use crate::completion::is_importable;
use crate::config::Config;
use crate::models::{DirectoryMeta, EntryKind, ListingEntry, ModuleName, PackageInfo};

use super::humanize::{format_size, relative_time};
use super::markdown::MarkdownBuilder;
use super::std_table::{std_module_description, STD_DESCRIPTION};

/// Public site and documentation hosts used in blurb links.
#[derive(Debug, Clone)]
pub struct SiteLinks {
    pub site: String,
    pub docs: String,
}

impl SiteLinks {
    pub fn new(site: impl Into<String>, docs: impl Into<String>) -> Self {
        Self {
            site: site.into().trim_end_matches('/').to_string(),
            docs: docs.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.registry_site_url, &config.registry_docs_url)
    }

    /// Registry page of a module.
    pub fn package(&self, module: &ModuleName) -> String {
        if module.is_std() {
            format!("{}/std", self.site)
        } else {
            format!("{}/x/{module}", self.site)
        }
    }

    /// Registry URL of a file or directory of a published version.
    pub fn source(&self, module: &ModuleName, version: &str, path: &str) -> String {
        let path = path.trim_start_matches('/');
        let base = if module.is_std() {
            format!("{}/std@{version}", self.site)
        } else {
            format!("{}/x/{module}@{version}", self.site)
        };
        if path.is_empty() {
            base
        } else {
            format!("{base}/{path}")
        }
    }

    /// Generated documentation of a file (or a version's entry point).
    pub fn docs(&self, module: &ModuleName, version: &str, path: &str) -> String {
        format!("{}/{}", self.docs, self.source(module, version, path))
    }
}

fn description_of(module: &ModuleName, info: Option<&PackageInfo>) -> Option<String> {
    if module.is_std() {
        return Some(STD_DESCRIPTION.to_string());
    }
    info.map(|i| i.description.clone()).filter(|d| !d.trim().is_empty())
}

fn stars(count: u64) -> String {
    if count == 1 {
        "★ 1 star".to_string()
    } else {
        format!("★ {count} stars")
    }
}

fn file_count(meta: &DirectoryMeta, under: &str) -> usize {
    let prefix = format!("/{}", under.trim_start_matches('/'));
    meta.listing
        .iter()
        .filter(|e| e.kind == EntryKind::File && e.path.starts_with(&prefix))
        .count()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// == Package Details ==
/// Blurb for a module as a whole: description, stars and registry link.
pub fn package_details(
    module: &ModuleName,
    info: Option<&PackageInfo>,
    links: &SiteLinks,
) -> String {
    let mut md = MarkdownBuilder::new();
    md.h2(module.as_str());

    match description_of(module, info) {
        Some(description) => md.p(description),
        None => md.note("No description provided."),
    };

    if let Some(info) = info.filter(|_| !module.is_std()) {
        md.facts([stars(info.star_count)]);
    }

    md.links([("View on registry", links.package(module))]);
    md.build()
}

// == Version Details ==
/// Blurb for a published version: publish time, size and links.
pub fn version_details(
    module: &ModuleName,
    version: &str,
    info: Option<&PackageInfo>,
    meta: &DirectoryMeta,
    links: &SiteLinks,
    now: DateTime<Utc>,
) -> String {
    let mut md = MarkdownBuilder::new();
    md.h2(format!("{module}@{version}"));

    if let Some(description) = description_of(module, info) {
        md.p(description);
    }

    let published = match meta.uploaded_at {
        Some(at) => format!("Published {}", relative_time(at, now)),
        None => "Publish date unknown".to_string(),
    };
    let files = if meta.is_empty() {
        String::new()
    } else {
        plural(file_count(meta, ""), "file")
    };
    md.facts([published, files]);

    md.links([
        ("Browse", links.source(module, version, "")),
        ("Documentation", links.docs(module, version, "")),
    ]);
    md.build()
}

// == Path Details ==
/// Blurb for a file or directory within a published version.
///
/// A path missing from the listing is described as an empty file.
pub fn path_details(
    module: &ModuleName,
    version: &str,
    path: &str,
    meta: &DirectoryMeta,
    links: &SiteLinks,
) -> String {
    let entry = meta
        .entry(path)
        .cloned()
        .unwrap_or_else(|| ListingEntry::file(path.trim_end_matches('/'), 0));
    let relative = entry.path.trim_start_matches('/');

    let mut md = MarkdownBuilder::new();
    match entry.kind {
        EntryKind::Dir => md.h2(format!("{module}@{version}/{relative}/")),
        EntryKind::File => md.h2(format!("{module}@{version}/{relative}")),
    };

    if module.is_std() {
        if let Some(description) = std_module_description(relative) {
            md.p(description);
        }
    }

    match entry.kind {
        EntryKind::Dir => {
            md.facts([
                "directory".to_string(),
                plural(file_count(meta, &format!("{relative}/")), "file"),
            ]);
            md.links([("Browse", links.source(module, version, relative))]);
        }
        EntryKind::File => {
            md.facts(["file".to_string(), format_size(entry.size)]);
            let mut file_links = vec![("View source", links.source(module, version, relative))];
            if is_importable(relative) {
                file_links.push(("Documentation", links.docs(module, version, relative)));
            }
            md.links(file_links);
        }
    }
    md.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn links() -> SiteLinks {
        SiteLinks::new("https://registry.test/", "https://doc.test")
    }

    fn oak() -> ModuleName {
        ModuleName::parse("oak").unwrap()
    }

    fn meta() -> DirectoryMeta {
        DirectoryMeta::new(
            Some(Utc.with_ymd_and_hms(2024, 5, 29, 12, 0, 0).unwrap()),
            vec![
                ListingEntry::dir("/"),
                ListingEntry::file("/mod.ts", 2048),
                ListingEntry::dir("/http"),
                ListingEntry::file("/http/server.ts", 100),
                ListingEntry::file("/http/README.md", 100),
            ],
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_links() {
        let links = links();
        assert_eq!(links.package(&oak()), "https://registry.test/x/oak");
        assert_eq!(links.package(&ModuleName::std()), "https://registry.test/std");
        assert_eq!(
            links.source(&oak(), "v1.0.0", "/mod.ts"),
            "https://registry.test/x/oak@v1.0.0/mod.ts"
        );
        assert_eq!(
            links.docs(&ModuleName::std(), "0.200.0", "fs/mod.ts"),
            "https://doc.test/https://registry.test/std@0.200.0/fs/mod.ts"
        );
    }

    #[test]
    fn test_package_details() {
        let info = PackageInfo::new("oak", "A middleware framework", 5000);
        let md = package_details(&oak(), Some(&info), &links());
        assert!(md.starts_with("## oak"));
        assert!(md.contains("A middleware framework"));
        assert!(md.contains("★ 5000 stars"));
        assert!(md.contains("(https://registry.test/x/oak)"));
    }

    #[test]
    fn test_package_details_without_info() {
        let md = package_details(&oak(), None, &links());
        assert!(md.contains("_No description provided._"));
        assert!(!md.contains("★"));
    }

    #[test]
    fn test_std_package_details() {
        let md = package_details(&ModuleName::std(), None, &links());
        assert!(md.contains(STD_DESCRIPTION));
    }

    #[test]
    fn test_version_details() {
        let info = PackageInfo::new("oak", "A middleware framework", 5000);
        let md = version_details(&oak(), "v12.0.0", Some(&info), &meta(), &links(), now());
        assert!(md.starts_with("## oak@v12.0.0"));
        assert!(md.contains("Published 3 days ago · 3 files"));
        assert!(md.contains("[Browse](https://registry.test/x/oak@v12.0.0)"));
    }

    #[test]
    fn test_version_details_without_meta() {
        let md = version_details(&oak(), "v0.0.0", None, &DirectoryMeta::empty(), &links(), now());
        assert!(md.contains("Publish date unknown"));
        assert!(!md.contains("files"));
    }

    #[test]
    fn test_file_details() {
        let md = path_details(&oak(), "v12.0.0", "mod.ts", &meta(), &links());
        assert!(md.starts_with("## oak@v12.0.0/mod.ts"));
        assert!(md.contains("file · 2.0 KB"));
        assert!(md.contains("[Documentation](https://doc.test/"));
    }

    #[test]
    fn test_directory_details() {
        let md = path_details(&oak(), "v12.0.0", "http/", &meta(), &links());
        assert!(md.starts_with("## oak@v12.0.0/http/"));
        assert!(md.contains("directory · 2 files"));
    }

    #[test]
    fn test_missing_path_is_empty_file() {
        let md = path_details(&oak(), "v12.0.0", "nope.ts", &meta(), &links());
        assert!(md.contains("file · 0 B"));
    }

    #[test]
    fn test_std_path_merges_module_description() {
        let std = ModuleName::std();
        let md = path_details(&std, "0.200.0", "http/server.ts", &meta(), &links());
        assert!(md.contains(std_module_description("http").unwrap()));

        let md = path_details(&std, "0.200.0", "mod.ts", &meta(), &links());
        assert!(md.starts_with("## std@0.200.0/mod.ts\n\nfile"));
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let a = path_details(&oak(), "v1", "http/", &meta(), &links());
        let b = path_details(&oak(), "v1", "http/", &meta(), &links());
        assert_eq!(a, b);
    }
}
