//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::{AppError, Result};

/// Resolve a potentially relative URL against a base URL.
///
/// Absolute-path hrefs get the base's origin prefixed; absolute URLs pass
/// through unchanged.
pub fn resolve_url(base: &Url, href: &str) -> Result<String> {
    base.join(href.trim())
        .map(|u| u.to_string())
        .map_err(|e| AppError::parse(format!("cannot resolve link '{href}': {e}")))
}
