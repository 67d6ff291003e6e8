use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use vb_config::{DatabaseConfig, NotifyConfig, VenueConfig};
use vb_db::VenueDb;
use vb_db::desk::BookingDesk;
use vb_db::notify::{NoopSink, NotificationSink, OutboxSink, admin_recipients};
use vb_db::recorder::AuditRecorder;
use vb_db::service::BookingService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: VenueConfig,
    pub db: Arc<VenueDb>,
    pub desk: BookingDesk,
}

impl AppContext {
    /// Open the database and wire the booking desk on top of it.
    pub async fn init(config: VenueConfig) -> anyhow::Result<Self> {
        let db = Arc::new(open_database(&config.database).await?);
        let notifier = build_notifier(&config.notify, &db).await?;

        let service = BookingService::new(Arc::clone(&db), notifier);
        let recorder = AuditRecorder::new(db.clone());
        let desk = BookingDesk::new(service, recorder);

        Ok(Self { config, db, desk })
    }
}

/// Open (and migrate) the configured database, creating its directory first.
pub async fn open_database(config: &DatabaseConfig) -> anyhow::Result<VenueDb> {
    if !config.is_in_memory() {
        ensure_parent_dir(Path::new(&config.path))?;
    }
    VenueDb::open_local(&config.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.path))
}

pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

async fn build_notifier(
    config: &NotifyConfig,
    db: &VenueDb,
) -> anyhow::Result<Arc<dyn NotificationSink>> {
    if !config.enabled {
        tracing::debug!("notifications disabled");
        return Ok(Arc::new(NoopSink));
    }

    let admins = db
        .list_admins()
        .await
        .context("failed to look up administrator accounts")?;
    let recipients = admin_recipients(&config.admin_addresses, &admins);
    if recipients.is_empty() {
        tracing::warn!("no administrator addresses configured; only owners will be notified");
    }

    let sink = OutboxSink::new(&config.outbox_path, &config.sender, recipients)
        .context("failed to prepare notification templates")?;
    Ok(Arc::new(sink))
}
