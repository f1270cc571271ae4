//! Search Module
//!
//! Module-name search for the top-level completion route.

mod index;
mod scoring;

pub use index::{exact_preselect, IndexSnapshot, SearchHit, SearchIndex, DEFAULT_REFRESH_WINDOW};
pub use scoring::MATCH_THRESHOLD;
