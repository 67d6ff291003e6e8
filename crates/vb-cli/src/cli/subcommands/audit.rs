use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

/// Audit trail commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// List entries, newest first.
    List(AuditListArgs),
    /// Show one entry.
    Show { id: i64 },
}

#[derive(Clone, Debug, Args)]
pub struct AuditListArgs {
    /// Entity tag, e.g. reservations
    #[arg(long)]
    pub entity: Option<String>,
    #[arg(long)]
    pub entity_id: Option<i64>,
    /// create, update, delete
    #[arg(long)]
    pub action: Option<String>,
    /// Acting account id
    #[arg(long)]
    pub actor: Option<i64>,
    /// RFC 3339 lower bound, inclusive
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,
    /// RFC 3339 upper bound, inclusive
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
}
