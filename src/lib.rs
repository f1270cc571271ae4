//! Registry Completions - import-path completion backend for a module registry
//!
//! Serves editor completions for module names, versions and file paths,
//! plus markdown details, from cached upstream registry metadata.

pub mod api;
pub mod cache;
pub mod completion;
pub mod config;
pub mod details;
pub mod error;
pub mod models;
pub mod registry;
pub mod search;

pub use api::AppState;
pub use config::Config;
