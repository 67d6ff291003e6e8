use std::path::Path;

use serde::Serialize;
use vb_config::VenueConfig;

use crate::cli::GlobalFlags;
use crate::context::{ensure_parent_dir, open_database};
use crate::output::output;

#[derive(Serialize)]
struct InitResponse<'a> {
    database: &'a str,
    outbox: Option<&'a str>,
}

/// Handle `vbk init`: create the database file and apply migrations.
pub async fn handle(config: &VenueConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    open_database(&config.database).await?;

    let outbox = if config.notify.enabled {
        ensure_parent_dir(Path::new(&config.notify.outbox_path))?;
        Some(config.notify.outbox_path.as_str())
    } else {
        None
    };

    tracing::info!(database = %config.database.path, "database ready");
    output(
        &InitResponse {
            database: &config.database.path,
            outbox,
        },
        flags.output,
    )
}
