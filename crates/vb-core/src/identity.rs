use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Caller identity supplied by the external identity gate.
///
/// The core trusts these fields completely. Role checks for administrative
/// listings happen before any venuebook call is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

impl Actor {
    /// Human-readable label for audit views.
    ///
    /// Falls back through full name, username, then display name. Blank
    /// values are skipped.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        [&self.full_name, &self.username, &self.display_name]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(String::from)
    }
}

/// Network origin of a mutating call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequestOrigin {
    pub ip: Option<String>,
    pub agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor {
            id: 7,
            role: Role::Client,
            display_name: None,
            username: None,
            full_name: None,
        }
    }

    #[test]
    fn label_prefers_full_name() {
        let a = Actor {
            full_name: Some("Ada Lovelace".into()),
            username: Some("ada".into()),
            display_name: Some("A.".into()),
            ..actor()
        };
        assert_eq!(a.label().as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn label_skips_blank_values() {
        let a = Actor {
            full_name: Some("   ".into()),
            username: None,
            display_name: Some("Front desk".into()),
            ..actor()
        };
        assert_eq!(a.label().as_deref(), Some("Front desk"));
    }

    #[test]
    fn label_none_when_nothing_set() {
        assert_eq!(actor().label(), None);
    }
}
