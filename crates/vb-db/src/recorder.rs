//! Best-effort audit capture.
//!
//! [`AuditRecorder::log`] is the one call surface mutating code uses to
//! emit an audit entry. It never returns an error: a store failure becomes
//! [`AuditOutcome::Dropped`] plus a `warn!` event, and the mutation that
//! triggered it is unaffected.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use vb_core::changes;
use vb_core::entities::{AuditEntry, NewAuditEntry};
use vb_core::enums::{AuditAction, EntityType};
use vb_core::identity::{Actor, RequestOrigin};
use vb_core::snapshot::schema_for;

use crate::VenueDb;
use crate::error::DatabaseError;

/// Where audit entries are persisted.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn insert(&self, entry: &NewAuditEntry) -> Result<AuditEntry, DatabaseError>;
}

#[async_trait]
impl AuditStore for VenueDb {
    async fn insert(&self, entry: &NewAuditEntry) -> Result<AuditEntry, DatabaseError> {
        self.insert_audit(entry).await
    }
}

/// One mutation to record.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub entity: EntityType,
    pub entity_id: i64,
    pub action: AuditAction,
    pub actor: Option<Actor>,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub origin: RequestOrigin,
}

/// What happened to an audit request.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    Recorded(AuditEntry),
    Dropped { reason: String },
}

impl AuditOutcome {
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }

    #[must_use]
    pub const fn entry(&self) -> Option<&AuditEntry> {
        match self {
            Self::Recorded(entry) => Some(entry),
            Self::Dropped { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    #[must_use]
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Normalize and persist one audit entry.
    pub async fn log(&self, request: AuditRequest) -> AuditOutcome {
        let entry = build_entry(request);
        match self.store.insert(&entry).await {
            Ok(stored) => {
                tracing::debug!(
                    entity = %stored.entity_type,
                    entity_id = stored.entity_id,
                    action = %stored.action,
                    audit_id = stored.id,
                    "audit entry recorded"
                );
                AuditOutcome::Recorded(stored)
            }
            Err(e) => {
                tracing::warn!(
                    entity = %entry.entity_type,
                    entity_id = entry.entity_id,
                    action = %entry.action,
                    error = %e,
                    "audit entry dropped"
                );
                AuditOutcome::Dropped {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn build_entry(request: AuditRequest) -> NewAuditEntry {
    let AuditRequest {
        entity,
        entity_id,
        action,
        actor,
        before,
        after,
        origin,
    } = request;

    let normalize = |value: Value| match schema_for(entity) {
        Some(schema) => schema.normalize(&value),
        None => changes::normalize(&value),
    };
    let before = before
        .filter(|_| action.has_before())
        .filter(|v| !v.is_null())
        .map(normalize);
    let after = after
        .filter(|_| action.has_after())
        .filter(|v| !v.is_null())
        .map(normalize);

    NewAuditEntry {
        entity_type: entity,
        entity_id,
        action,
        actor_id: actor.as_ref().map(|a| a.id),
        actor_label: actor.as_ref().and_then(Actor::label),
        actor_role: actor.as_ref().map(|a| a.role.as_str().to_string()),
        before,
        after,
        origin_ip: origin.ip.as_deref().map(canonical_ip),
        origin_agent: origin.agent.filter(|a| !a.trim().is_empty()),
    }
}

/// Map loopback spellings to `127.0.0.1`; other addresses pass through trimmed.
#[must_use]
pub fn canonical_ip(ip: &str) -> String {
    match ip.trim() {
        "::1" | "::ffff:127.0.0.1" | "[::1]" => "127.0.0.1".to_string(),
        other => other.to_string(),
    }
}
