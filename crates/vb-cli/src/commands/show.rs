use crate::cli::GlobalFlags;
use crate::cli::root_commands::ShowArgs;
use crate::commands::shared::identity::actor;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vbk show`.
pub async fn handle(args: &ShowArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    actor(&flags.identity)?;
    let state = ctx.desk.service().state(args.id, args.include_cancelled).await?;
    output(&state, flags.output)
}
