//! Request, response and upstream models
//!
//! DTOs for HTTP bodies plus the typed schemas of the upstream registry
//! payloads.

pub mod requests;
pub mod responses;
pub mod upstream;

// Re-export commonly used types
pub use requests::{normalize_typed_path, ModuleName, LATEST_ALIAS, STD_MODULE};
pub use responses::{
    CompletionList, ErrorResponse, HealthResponse, MarkdownDetails, StatsResponse,
};
pub use upstream::{DirectoryMeta, EntryKind, ListingEntry, PackageInfo, VersionInfo};
