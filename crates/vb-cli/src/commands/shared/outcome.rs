//! Serializable summaries of the side effects that ride along a mutation.

use serde::Serialize;
use vb_db::recorder::AuditOutcome;
use vb_db::service::NotifyOutcome;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AuditStatus {
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&AuditOutcome> for AuditStatus {
    fn from(outcome: &AuditOutcome) -> Self {
        match outcome {
            AuditOutcome::Recorded(entry) => Self {
                recorded: true,
                entry_id: Some(entry.id),
                reason: None,
            },
            AuditOutcome::Dropped { reason } => Self {
                recorded: false,
                entry_id: None,
                reason: Some(reason.clone()),
            },
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NotifyStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<NotifyOutcome> for NotifyStatus {
    fn from(outcome: NotifyOutcome) -> Self {
        match outcome {
            NotifyOutcome::Delivered => Self {
                status: "delivered",
                reason: None,
            },
            NotifyOutcome::Skipped { reason } => Self {
                status: "skipped",
                reason: Some(reason),
            },
            NotifyOutcome::Failed { reason } => Self {
                status: "failed",
                reason: Some(reason),
            },
        }
    }
}
