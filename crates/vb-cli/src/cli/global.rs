use clap::ValueEnum;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Raw,
}

/// Caller identity as asserted by whoever invokes the binary.
#[derive(Clone, Debug, Default)]
pub struct IdentityFlags {
    pub actor_id: Option<i64>,
    pub actor_role: String,
    pub actor_name: Option<String>,
    pub origin_ip: Option<String>,
    pub origin_agent: Option<String>,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub output: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub identity: IdentityFlags,
}
