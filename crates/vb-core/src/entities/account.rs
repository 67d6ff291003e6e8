use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Account record from the master-data directory. Read-only in this core;
/// used as the notification recipient and for owner display names.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

impl Account {
    /// Name shown to humans: full name, then display name, then username.
    #[must_use]
    pub fn presentable_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or(&self.username)
    }
}
