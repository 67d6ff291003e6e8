//! CSV rendering into a staged temp file.

use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::row::ReportRow;

/// A rendered file left on disk for the caller to stream and remove.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staged file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if removal fails.
    pub fn discard(self) -> std::io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}

/// Write `rows` as CSV with a header line into a new temp file.
///
/// The file is created in `staging_dir` when given, otherwise in the system
/// temp directory.
///
/// # Errors
///
/// `ReportError::Empty` for no rows; `Csv`/`Io` if writing fails.
pub fn render_csv<R: ReportRow>(
    rows: &[R],
    staging_dir: Option<&Path>,
) -> Result<StagedFile, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::Empty);
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix("venuebook-report-").suffix(".csv");
    let file = match staging_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    let file = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    let (_, path) = file.keep().map_err(|e| ReportError::Io(e.error))?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "csv report staged");
    Ok(StagedFile { path })
}
