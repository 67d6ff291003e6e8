//! Report rendering configuration.

use serde::{Deserialize, Serialize};

fn default_organization() -> String {
    "venuebook".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Name printed in PDF report headers.
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Directory for staged CSV files. Empty means the system temp dir.
    #[serde(default)]
    pub staging_dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            staging_dir: String::new(),
        }
    }
}

impl ReportConfig {
    /// Staging directory override, if one is configured.
    pub fn staging_dir(&self) -> Option<&str> {
        if self.staging_dir.is_empty() {
            None
        } else {
            Some(&self.staging_dir)
        }
    }
}
