//! Details Module
//!
//! Markdown blurbs shown next to a completion item.

mod formatter;
mod humanize;
mod markdown;
mod std_table;

pub use formatter::{package_details, path_details, version_details, SiteLinks};
pub use humanize::{format_size, relative_time};
pub use markdown::MarkdownBuilder;
pub use std_table::{std_module_description, STD_DESCRIPTION};
