//! Inbound request parameters
//!
//! Path segments captured by the router, validated before they reach the
//! cache layer.

use std::fmt;

use crate::error::{ApiError, Result};

/// Maximum allowed module name length in bytes
pub const MAX_MODULE_NAME_LENGTH: usize = 64;

/// Version alias resolved to the module's latest published version
pub const LATEST_ALIAS: &str = "_latest";

/// Name of the standard library pseudo-module
pub const STD_MODULE: &str = "std";

/// A validated registry module name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Validates a raw module name.
    ///
    /// Names are 1 to 64 bytes of ASCII alphanumerics, `_` or `-`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Module name cannot be empty".to_string(),
            ));
        }
        if raw.len() > MAX_MODULE_NAME_LENGTH {
            return Err(ApiError::InvalidRequest(format!(
                "Module name exceeds maximum length of {} characters",
                MAX_MODULE_NAME_LENGTH
            )));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(ApiError::InvalidRequest(format!(
                "Invalid module name: {raw}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The standard library pseudo-module.
    pub fn std() -> Self {
        Self(STD_MODULE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_std(&self) -> bool {
        self.0 == STD_MODULE
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a captured wildcard path into the typed-so-far form used by
/// the resolver: no leading slash, trailing slash kept.
pub fn normalize_typed_path(raw: &str) -> String {
    raw.trim_start_matches('/').to_string()
}
