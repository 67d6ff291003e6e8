use anyhow::{Context, bail};
use serde::Serialize;
use vb_db::service::ReservationState;
use vb_db::updates::reservation::{ReservationPatch, ReservationPatchBuilder};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AmendArgs;
use crate::commands::shared::identity::call_context;
use crate::commands::shared::input::read_json;
use crate::commands::shared::outcome::AuditStatus;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AmendResponse {
    previous: ReservationState,
    current: ReservationState,
    audit: AuditStatus,
}

/// Handle `vbk amend`.
pub async fn handle(args: &AmendArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let call = call_context(&flags.identity)?;
    let patch = match &args.input {
        Some(path) => read_json(Some(path)).context("failed to read reservation patch")?,
        None => patch_from_flags(args)?,
    };

    let amended = ctx.desk.amend(args.id, &patch, &call).await?;
    output(
        &AmendResponse {
            audit: AuditStatus::from(&amended.audit),
            previous: amended.value.previous,
            current: amended.value.current,
        },
        flags.output,
    )
}

fn patch_from_flags(args: &AmendArgs) -> anyhow::Result<ReservationPatch> {
    let mut builder = ReservationPatchBuilder::new();
    if let Some(date) = args.date {
        builder = builder.booking_date(date);
    }
    if let Some(venue) = args.venue {
        builder = builder.venue_id(venue);
    }
    if let Some(slot) = args.slot {
        builder = builder.slot_id(slot);
    }
    if let Some(theme) = &args.theme {
        builder = builder.theme(theme);
    }
    if let Some(total) = args.total {
        builder = builder.total_charge(total);
    }

    let patch = builder.build();
    if patch.is_empty() {
        bail!("nothing to amend: pass --input or at least one field flag");
    }
    Ok(patch)
}
