use std::path::PathBuf;

use clap::Subcommand;

/// Service bundle commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BundleCommands {
    /// Show the current bundle lines.
    Show { id: i64 },
    /// Replace the whole bundle.
    Replace {
        id: i64,
        /// `service_id=charge`, repeatable; no lines clears the bundle
        #[arg(long = "line")]
        lines: Vec<String>,
        /// JSON array of lines; overrides --line
        #[arg(long)]
        input: Option<PathBuf>,
    },
}
