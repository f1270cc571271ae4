//! Path Resolver
//!
//! Turns a version's flat directory listing and the path typed so far into
//! the next-segment completion items.

use std::path::Path;

use crate::models::{EntryKind, ListingEntry};

/// File extensions that can be imported, compared case-insensitively
pub const IMPORTABLE_EXTENSIONS: [&str; 9] =
    ["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts", "json"];

/// Completion items for `current_path` within `listing`.
///
/// Directories come first, then files, each in listing order. Items are
/// relative paths; directories end with `/`. A directory is only offered
/// when it is a direct child of `current_path` and holds at least one
/// importable file, and files reachable through an offered directory are
/// left out.
pub fn resolve_completions(listing: &[ListingEntry], current_path: &str) -> Vec<String> {
    let current_path = current_path.trim_start_matches('/');
    let prefix = format!("/{current_path}");

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in listing {
        if entry.path.len() <= prefix.len() || !entry.path.starts_with(&prefix) {
            continue;
        }
        if is_hidden(&entry.path) {
            continue;
        }

        let relative = entry.path.trim_start_matches('/');
        match entry.kind {
            EntryKind::Dir => dirs.push(format!("{}/", relative.trim_end_matches('/'))),
            EntryKind::File if is_importable(relative) => files.push(relative.to_string()),
            EntryKind::File => {}
        }
    }

    // Emptiness is judged against importable files only
    dirs.retain(|dir| {
        is_direct_child(dir, current_path) && files.iter().any(|f| f.starts_with(dir.as_str()))
    });
    files.retain(|file| !dirs.iter().any(|dir| file.starts_with(dir.as_str())));

    dirs.extend(files);
    dirs
}

/// Whether any segment of `path` starts with `_` or `.`.
pub fn is_hidden(path: &str) -> bool {
    path.split('/')
        .any(|segment| segment.starts_with('_') || segment.starts_with('.'))
}

pub fn is_importable(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMPORTABLE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

fn is_direct_child(dir: &str, current_path: &str) -> bool {
    dir.strip_prefix(current_path)
        .is_some_and(|rest| !rest.trim_end_matches('/').contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<ListingEntry> {
        vec![
            ListingEntry::file("/mod.ts", 120),
            ListingEntry::dir("/examples"),
            ListingEntry::file("/examples/a.ts", 50),
            ListingEntry::dir("/.github"),
        ]
    }

    #[test]
    fn test_root_listing() {
        assert_eq!(resolve_completions(&listing(), ""), vec!["examples/", "mod.ts"]);
    }

    #[test]
    fn test_stepping_into_directory() {
        assert_eq!(
            resolve_completions(&listing(), "examples/"),
            vec!["examples/a.ts"]
        );
    }

    #[test]
    fn test_partial_segment() {
        assert_eq!(resolve_completions(&listing(), "exa"), vec!["examples/"]);
        assert_eq!(resolve_completions(&listing(), "mo"), vec!["mod.ts"]);
    }

    #[test]
    fn test_directory_with_only_unimportable_files_is_pruned() {
        let listing = vec![
            ListingEntry::dir("/docs"),
            ListingEntry::file("/docs/README.md", 300),
            ListingEntry::file("/docs/logo.png", 900),
            ListingEntry::file("/mod.ts", 10),
        ];
        assert_eq!(resolve_completions(&listing, ""), vec!["mod.ts"]);
    }

    #[test]
    fn test_empty_directory_is_pruned() {
        let listing = vec![ListingEntry::dir("/empty"), ListingEntry::file("/lib.js", 1)];
        assert_eq!(resolve_completions(&listing, ""), vec!["lib.js"]);
    }

    #[test]
    fn test_only_direct_child_directories() {
        let listing = vec![
            ListingEntry::dir("/a"),
            ListingEntry::dir("/a/b"),
            ListingEntry::file("/a/b/c.ts", 1),
        ];
        assert_eq!(resolve_completions(&listing, ""), vec!["a/"]);
        assert_eq!(resolve_completions(&listing, "a/"), vec!["a/b/"]);
        assert_eq!(resolve_completions(&listing, "a/b/"), vec!["a/b/c.ts"]);
    }

    #[test]
    fn test_nested_file_without_listed_directory_is_offered() {
        let listing = vec![ListingEntry::file("/deep/x/mod.ts", 1)];
        assert_eq!(resolve_completions(&listing, ""), vec!["deep/x/mod.ts"]);
    }

    #[test]
    fn test_hidden_and_private_segments_are_dropped() {
        let listing = vec![
            ListingEntry::dir("/_internal"),
            ListingEntry::file("/_internal/util.ts", 1),
            ListingEntry::dir("/src"),
            ListingEntry::file("/src/.eslintrc.json", 1),
            ListingEntry::file("/src/_private.ts", 1),
            ListingEntry::file("/.hidden.ts", 1),
        ];
        assert!(resolve_completions(&listing, "").is_empty());
    }

    #[test]
    fn test_extensions_are_case_insensitive() {
        let listing = vec![
            ListingEntry::file("/A.TS", 1),
            ListingEntry::file("/b.Json", 1),
            ListingEntry::file("/c.d.mts", 1),
            ListingEntry::file("/LICENSE", 1),
            ListingEntry::file("/d.ts.map", 1),
        ];
        assert_eq!(
            resolve_completions(&listing, ""),
            vec!["A.TS", "b.Json", "c.d.mts"]
        );
    }

    #[test]
    fn test_directories_before_files_in_listing_order() {
        let listing = vec![
            ListingEntry::file("/z.ts", 1),
            ListingEntry::dir("/y"),
            ListingEntry::file("/a.ts", 1),
            ListingEntry::dir("/b"),
            ListingEntry::file("/b/x.js", 1),
            ListingEntry::file("/y/x.js", 1),
        ];
        assert_eq!(
            resolve_completions(&listing, ""),
            vec!["y/", "b/", "z.ts", "a.ts"]
        );
    }

    #[test]
    fn test_leading_slash_in_current_path() {
        assert_eq!(
            resolve_completions(&listing(), "/examples/"),
            resolve_completions(&listing(), "examples/")
        );
    }

    #[test]
    fn test_exact_file_path_has_no_completions() {
        assert!(resolve_completions(&listing(), "mod.ts").is_empty());
    }

    #[test]
    fn test_is_importable() {
        assert!(is_importable("mod.ts"));
        assert!(is_importable("deps/x.CJS"));
        assert!(!is_importable("Makefile"));
        assert!(!is_importable("style.css"));
    }
}
