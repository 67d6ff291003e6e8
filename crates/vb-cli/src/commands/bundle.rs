use anyhow::Context;
use serde::Serialize;
use vb_core::entities::BundleLine;
use vb_core::requests::BundleLineInput;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BundleCommands;
use crate::commands::shared::identity::{actor, call_context};
use crate::commands::shared::input::{parse_line, read_json};
use crate::commands::shared::outcome::AuditStatus;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct ReplaceResponse {
    reservation_id: i64,
    lines: Vec<BundleLine>,
    audit: AuditStatus,
}

/// Handle `vbk bundle`.
pub async fn handle(
    action: &BundleCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BundleCommands::Show { id } => {
            actor(&flags.identity)?;
            let lines = ctx.desk.service().bundle(*id).await?;
            output(&lines, flags.output)
        }
        BundleCommands::Replace { id, lines, input } => {
            let call = call_context(&flags.identity)?;
            let lines: Vec<BundleLineInput> = match input {
                Some(path) => read_json(Some(path)).context("failed to read bundle lines")?,
                None => lines.iter().map(|raw| parse_line(raw)).collect::<anyhow::Result<_>>()?,
            };

            let replaced = ctx.desk.replace_bundle(*id, &lines, &call).await?;
            output(
                &ReplaceResponse {
                    reservation_id: *id,
                    audit: AuditStatus::from(&replaced.audit),
                    lines: replaced.value,
                },
                flags.output,
            )
        }
    }
}
