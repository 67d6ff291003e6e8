//! Listing and pagination defaults.

use serde::{Deserialize, Serialize};

const fn default_page_size() -> u32 {
    20
}

const fn default_max_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    /// Page size used when a command does not pass `--page-size`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest page size a caller may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl ListingConfig {
    /// Resolve a requested page size against the configured default and cap.
    pub fn effective_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}
