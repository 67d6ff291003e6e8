//! Audit log repository.
//!
//! Append-only entries recording every mutation. The `changes` column holds
//! `{"before": .., "after": ..}`; reads tolerate text, blob, or NULL storage.

use chrono::{DateTime, Utc};
use serde_json::json;
use vb_core::entities::{AuditEntry, NewAuditEntry};
use vb_core::enums::{AuditAction, EntityType};
use vb_core::listing::{PageRequest, Paged};

use crate::VenueDb;
use crate::error::DatabaseError;
use crate::helpers::{decode_payload, format_timestamp, get_opt_i64, get_opt_string, parse_datetime, parse_enum};

const AUDIT_COLUMNS: &str = "id, entity_type, entity_id, action, actor_id, actor_label, actor_role,
        changes, origin_ip, origin_agent, created_at";

/// Filter criteria for audit queries. Every supplied field must match.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<i64>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    pub page: PageRequest,
}

fn row_to_entry(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    let changes = decode_payload(row.get_value(7)?);
    let (before, after) = split_changes(changes);
    Ok(AuditEntry {
        id: row.get::<i64>(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get::<i64>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        actor_id: get_opt_i64(row, 4)?,
        actor_label: get_opt_string(row, 5)?,
        actor_role: get_opt_string(row, 6)?,
        before,
        after,
        origin_ip: get_opt_string(row, 8)?,
        origin_agent: get_opt_string(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

/// Pull `before`/`after` out of a decoded `changes` payload.
fn split_changes(
    changes: Option<serde_json::Value>,
) -> (Option<serde_json::Value>, Option<serde_json::Value>) {
    let Some(serde_json::Value::Object(mut map)) = changes else {
        return (None, None);
    };
    let take = |v: Option<serde_json::Value>| v.filter(|v| !v.is_null());
    (take(map.remove("before")), take(map.remove("after")))
}

impl VenueDb {
    /// Append an audit entry and return it as stored, timestamp precision
    /// included.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn insert_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, DatabaseError> {
        let stamp = format_timestamp(Utc::now());
        let created_at = parse_datetime(&stamp)?;
        let changes = json!({ "before": entry.before, "after": entry.after }).to_string();

        let id = {
            let _gate = self.write_gate().await;
            self.conn()
                .execute(
                    "INSERT INTO audit_log (entity_type, entity_id, action, actor_id, actor_label,
                         actor_role, changes, origin_ip, origin_agent, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    libsql::params![
                        entry.entity_type.as_str(),
                        entry.entity_id,
                        entry.action.as_str(),
                        entry.actor_id,
                        entry.actor_label.as_deref(),
                        entry.actor_role.as_deref(),
                        changes,
                        entry.origin_ip.as_deref(),
                        entry.origin_agent.as_deref(),
                        stamp
                    ],
                )
                .await?;
            self.conn().last_insert_rowid()
        };

        Ok(AuditEntry {
            id,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action: entry.action,
            actor_id: entry.actor_id,
            actor_label: entry.actor_label.clone(),
            actor_role: entry.actor_role.clone(),
            before: entry.before.clone(),
            after: entry.after.clone(),
            origin_ip: entry.origin_ip.clone(),
            origin_agent: entry.origin_agent.clone(),
            created_at,
        })
    }

    /// Fetch one audit entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no entry has this id.
    pub async fn get_audit(&self, id: i64) -> Result<AuditEntry, DatabaseError> {
        let _read = self.read_gate().await;
        let sql = format!("SELECT {AUDIT_COLUMNS} FROM audit_log WHERE id = ?1");
        let mut rows = self.conn().query(&sql, [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NotFound {
            entity: "audit entry",
            id,
        })?;
        row_to_entry(&row)
    }

    /// Query audit entries newest-first, with the exact count under the
    /// same filter.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_audit(&self, filter: &AuditFilter) -> Result<Paged<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(eid) = filter.entity_id {
            params.push(libsql::Value::Integer(eid));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(actor_id) = filter.actor_id {
            params.push(libsql::Value::Integer(actor_id));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }
        if let Some(from) = filter.from {
            params.push(libsql::Value::Text(format_timestamp(from)));
            conditions.push(format!("created_at >= ?{}", params.len()));
        }
        if let Some(to) = filter.to {
            params.push(libsql::Value::Text(format_timestamp(to)));
            conditions.push(format!("created_at <= ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let _read = self.read_gate().await;
        let count_sql = format!("SELECT COUNT(*) FROM audit_log {where_clause}");
        let mut rows = self
            .conn()
            .query(&count_sql, libsql::params_from_iter(params.clone()))
            .await?;
        let total = match rows.next().await? {
            Some(row) => u64::try_from(row.get::<i64>(0)?).unwrap_or_default(),
            None => 0,
        };

        let sql = format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_log {where_clause}
             ORDER BY created_at DESC, id DESC LIMIT {} OFFSET {}",
            filter.page.page_size,
            filter.page.offset()
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_entry(&row)?);
        }

        Ok(Paged {
            items,
            total,
            page: filter.page.page,
            page_size: filter.page.page_size,
        })
    }
}
