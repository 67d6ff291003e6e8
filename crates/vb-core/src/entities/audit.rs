use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, EntityType};

/// An append-only audit log entry recording one mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditEntry {
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub action: AuditAction,
    pub actor_id: Option<i64>,
    pub actor_label: Option<String>,
    pub actor_role: Option<String>,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub origin_ip: Option<String>,
    pub origin_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An audit entry before the store assigns its id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewAuditEntry {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub action: AuditAction,
    pub actor_id: Option<i64>,
    pub actor_label: Option<String>,
    pub actor_role: Option<String>,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub origin_ip: Option<String>,
    pub origin_agent: Option<String>,
}
