//! Completion Module
//!
//! Pure functions turning cached metadata into completion items.

mod preselect;
mod resolver;


pub use preselect::{preselect, PRESELECT_PRIORITY};
pub use resolver::{is_hidden, is_importable, resolve_completions, IMPORTABLE_EXTENSIONS};

/// Versions starting with `prefix`, in manifest order.
pub fn filter_versions<'a>(versions: &'a [String], prefix: &str) -> Vec<&'a str> {
    versions
        .iter()
        .map(String::as_str)
        .filter(|v| v.starts_with(prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_versions() {
        let versions = vec!["v2.0.0".to_string(), "v1.2.0".to_string(), "v1.1.0".to_string()];
        assert_eq!(filter_versions(&versions, "v1."), vec!["v1.2.0", "v1.1.0"]);
        assert_eq!(filter_versions(&versions, "").len(), 3);
        assert!(filter_versions(&versions, "0.").is_empty());
    }
}
