use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::cli::subcommands::{AuditCommands, BundleCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the database and run migrations.
    Init,
    /// Book a venue from a JSON booking request.
    Book(BookArgs),
    /// Amend an active reservation.
    Amend(AmendArgs),
    /// Cancel a reservation.
    Cancel { id: i64 },
    /// Show one reservation with its service bundle.
    Show(ShowArgs),
    /// List reservations.
    List(ListArgs),
    /// Service bundle of a reservation.
    Bundle {
        #[command(subcommand)]
        action: BundleCommands,
    },
    /// Audit trail.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
    /// Render an aggregate report.
    Report(ReportArgs),
    /// Print the JSON schema of an input or output type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct BookArgs {
    /// JSON file with the booking request (stdin when absent or `-`)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct AmendArgs {
    pub id: i64,
    /// JSON file with the patch; overrides the field flags
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub venue: Option<i64>,
    #[arg(long)]
    pub slot: Option<i64>,
    #[arg(long)]
    pub theme: Option<String>,
    #[arg(long)]
    pub total: Option<Decimal>,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    pub id: i64,
    /// Also show cancelled reservations
    #[arg(long)]
    pub include_cancelled: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Every reservation instead of the caller's own (staff and admin only)
    #[arg(long)]
    pub all: bool,
    #[arg(long)]
    pub venue: Option<i64>,
    #[arg(long)]
    pub owner: Option<i64>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
    /// Sort key: date, total_charge, venue
    #[arg(long, default_value = "date")]
    pub sort: String,
    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub direction: String,
    #[arg(long)]
    pub include_cancelled: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReportKind {
    /// Bookings and revenue per venue
    Venues,
    /// Take-rate of each add-on service
    Services,
    /// Bookings per time slot
    Slots,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Csv,
    Pdf,
}

#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    pub kind: ReportKind,
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,
    /// First booking date included
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last booking date included
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Destination file (stdout when absent)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// booking, patch, bundle, reservation, audit-entry, actor
    pub type_name: String,
}
