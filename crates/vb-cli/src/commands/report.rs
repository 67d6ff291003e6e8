use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use chrono::Utc;
use vb_core::aggregates::ReportWindow;
use vb_report::{ReportMeta, ReportRow, render_csv, render_pdf};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ReportArgs, ReportFormat, ReportKind};
use crate::commands::shared::identity::require_staff;
use crate::context::AppContext;

/// Handle `vbk report`.
pub async fn handle(args: &ReportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    require_staff(&flags.identity, "reporting")?;
    let window = ReportWindow {
        from: args.from,
        to: args.to,
    };
    if let (Some(from), Some(to)) = (window.from, window.to) {
        if from > to {
            bail!("--from {from} is after --to {to}");
        }
    }

    match args.kind {
        ReportKind::Venues => emit(&ctx.db.venue_utilization(window).await?, window, args, ctx),
        ReportKind::Services => emit(&ctx.db.service_take_rate(window).await?, window, args, ctx),
        ReportKind::Slots => emit(&ctx.db.slot_demand(window).await?, window, args, ctx),
    }
}

fn emit<R: ReportRow>(
    rows: &[R],
    window: ReportWindow,
    args: &ReportArgs,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    match args.format {
        ReportFormat::Csv => {
            let staging = ctx.config.reports.staging_dir().map(Path::new);
            let staged = render_csv(rows, staging)?;
            let copied = copy_out(staged.path(), args.out.as_deref());
            if let Err(error) = staged.discard() {
                tracing::warn!(%error, "failed to remove staged report file");
            }
            copied?;
        }
        ReportFormat::Pdf => {
            let meta = ReportMeta {
                organization: ctx.config.reports.organization.clone(),
                generated_at: Utc::now(),
                window,
            };
            let bytes = render_pdf(rows, &meta)?;
            write_out(&bytes, args.out.as_deref())?;
        }
    }
    tracing::info!(report = R::TITLE, rows = rows.len(), "report written");
    Ok(())
}

fn copy_out(staged: &Path, out: Option<&Path>) -> anyhow::Result<()> {
    let mut source = File::open(staged)
        .with_context(|| format!("failed to open staged report {}", staged.display()))?;
    match out {
        Some(path) => {
            let mut target = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            std::io::copy(&mut source, &mut target)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            std::io::copy(&mut source, &mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn write_out(bytes: &[u8], out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
