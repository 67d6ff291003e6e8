use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::identity::call_context;
use crate::commands::shared::outcome::AuditStatus;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CancelResponse {
    reservation_id: i64,
    message: String,
    audit: AuditStatus,
}

/// Handle `vbk cancel`.
pub async fn handle(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let call = call_context(&flags.identity)?;
    let cancelled = ctx.desk.cancel(id, &call).await?;
    output(
        &CancelResponse {
            audit: AuditStatus::from(&cancelled.audit),
            reservation_id: cancelled.value.reservation_id,
            message: cancelled.value.message,
        },
        flags.output,
    )
}
