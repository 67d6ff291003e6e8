use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, IdentityFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `vbk` binary.
#[derive(Debug, Parser)]
#[command(name = "vbk", version, about = "venuebook - venue reservations, audit trail, reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub output: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Acting account id
    #[arg(long, global = true)]
    pub actor_id: Option<i64>,

    /// Acting account role: client, staff, admin
    #[arg(long, global = true, default_value = "client")]
    pub actor_role: String,

    /// Acting account display name
    #[arg(long, global = true)]
    pub actor_name: Option<String>,

    /// Client address recorded in the audit trail
    #[arg(long, global = true)]
    pub origin_ip: Option<String>,

    /// Client agent string recorded in the audit trail
    #[arg(long, global = true)]
    pub origin_agent: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            output: self.output,
            quiet: self.quiet,
            verbose: self.verbose,
            identity: IdentityFlags {
                actor_id: self.actor_id,
                actor_role: self.actor_role.clone(),
                actor_name: self.actor_name.clone(),
                origin_ip: self.origin_ip.clone(),
                origin_agent: self.origin_agent.clone(),
            },
        }
    }
}
