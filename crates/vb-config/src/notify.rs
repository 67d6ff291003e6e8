//! Booking notification configuration.

use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

fn default_outbox_path() -> String {
    ".venuebook/outbox.jsonl".into()
}

fn default_sender() -> String {
    "bookings@venuebook.local".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Whether booking confirmations are produced at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// JSONL file that receives rendered messages for the mail relay.
    #[serde(default = "default_outbox_path")]
    pub outbox_path: String,

    /// `From` address on rendered messages.
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Administrator addresses copied on every booking confirmation.
    #[serde(default)]
    pub admin_addresses: Vec<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            outbox_path: default_outbox_path(),
            sender: default_sender(),
            admin_addresses: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = NotifyConfig::default();
        assert!(config.enabled);
        assert_eq!(config.outbox_path, ".venuebook/outbox.jsonl");
        assert!(config.admin_addresses.is_empty());
    }
}
