//! Preselect Heuristic
//!
//! Picks the entry-point file an editor should highlight by default.

/// Conventional entry points, most preferred first
pub const PRESELECT_PRIORITY: [&str; 9] = [
    "mod.ts",
    "mod.js",
    "main.ts",
    "main.js",
    "lib.ts",
    "lib.js",
    "index.ts",
    "index.mjs",
    "index.js",
];

/// Chooses the default item from a completion list.
///
/// Bare names are matched first; only when none of them appears are items
/// ending in `/<name>` considered, in the same priority order.
pub fn preselect<S: AsRef<str>>(items: &[S]) -> Option<String> {
    let exact = PRESELECT_PRIORITY
        .iter()
        .find_map(|name| items.iter().find(|item| item.as_ref() == *name));
    if let Some(item) = exact {
        return Some(item.as_ref().to_string());
    }

    PRESELECT_PRIORITY.iter().find_map(|name| {
        let suffix = format!("/{name}");
        items
            .iter()
            .find(|item| item.as_ref().ends_with(&suffix))
            .map(|item| item.as_ref().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_over_list_order() {
        assert_eq!(preselect(&["index.js", "mod.ts"]).as_deref(), Some("mod.ts"));
        assert_eq!(preselect(&["lib.js", "main.js"]).as_deref(), Some("main.js"));
    }

    #[test]
    fn test_bare_match_wins_over_nested_higher_priority() {
        assert_eq!(
            preselect(&["src/mod.ts", "index.js"]).as_deref(),
            Some("index.js")
        );
    }

    #[test]
    fn test_nested_match() {
        let items = ["http/", "http/server.ts", "http/index.mjs", "http/lib.ts"];
        assert_eq!(preselect(&items).as_deref(), Some("http/lib.ts"));
    }

    #[test]
    fn test_suffix_requires_segment_boundary() {
        assert_eq!(preselect(&["src/remod.ts", "unmod.ts"]), None);
    }

    #[test]
    fn test_no_preselect() {
        assert_eq!(preselect::<&str>(&[]), None);
        assert_eq!(preselect(&["README.md", "deps.ts"]), None);
    }

    #[test]
    fn test_owned_items() {
        let items = vec!["examples/".to_string(), "mod.ts".to_string()];
        assert_eq!(preselect(&items).as_deref(), Some("mod.ts"));
    }
}
