use anyhow::Context;
use serde::Serialize;
use vb_core::requests::BookingRequest;
use vb_db::service::ReservationState;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BookArgs;
use crate::commands::shared::identity::call_context;
use crate::commands::shared::input::read_json;
use crate::commands::shared::outcome::{AuditStatus, NotifyStatus};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct BookResponse {
    #[serde(flatten)]
    state: ReservationState,
    audit: AuditStatus,
    notification: NotifyStatus,
}

/// Handle `vbk book`.
pub async fn handle(args: &BookArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let call = call_context(&flags.identity)?;
    let request: BookingRequest =
        read_json(args.input.as_deref()).context("failed to read booking request")?;

    let booked = ctx.desk.book(&request, &call).await?;
    let audit = AuditStatus::from(&booked.audit);
    // The process exits right after printing, so wait for the notice task.
    let notification = NotifyStatus::from(booked.value.notification.outcome().await);

    output(
        &BookResponse {
            state: booked.value.state,
            audit,
            notification,
        },
        flags.output,
    )
}
