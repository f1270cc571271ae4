//! API Module
//!
//! HTTP handlers and routing for the completion server.
//!
//! Completion endpoints answer `{ items, isIncomplete, preselect? }`,
//! details endpoints answer `{ kind: "markdown", value }`. Every response
//! carries a Cache-Control header picked from three bands.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
