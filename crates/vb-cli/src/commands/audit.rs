use vb_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{AuditCommands, AuditListArgs};
use crate::commands::shared::identity::require_staff;
use crate::commands::shared::paging::page_request;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vbk audit`.
pub async fn handle(
    action: &AuditCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    require_staff(&flags.identity, "the audit trail")?;
    match action {
        AuditCommands::List(args) => {
            let filter = build_filter(args, ctx)?;
            let page = ctx.db.list_audit(&filter).await?;
            output(&page, flags.output)
        }
        AuditCommands::Show { id } => {
            let entry = ctx.db.get_audit(*id).await?;
            output(&entry, flags.output)
        }
    }
}

fn build_filter(args: &AuditListArgs, ctx: &AppContext) -> anyhow::Result<AuditFilter> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            anyhow::bail!("--from {from} is after --to {to}");
        }
    }
    Ok(AuditFilter {
        entity_type: parse_opt_enum(args.entity.as_deref(), "entity")?,
        entity_id: args.entity_id,
        action: parse_opt_enum(args.action.as_deref(), "action")?,
        actor_id: args.actor,
        from: args.from,
        to: args.to,
        page: page_request(args.page, args.page_size, &ctx.config.listing),
    })
}
