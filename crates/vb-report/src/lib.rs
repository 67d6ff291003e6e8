//! # vb-report
//!
//! Turns aggregate result sets into documents.
//!
//! - [`render_csv`] writes a staged temp file with a fixed header taken from
//!   the row shape. The caller streams it and then deletes it.
//! - [`render_pdf`] renders the rows through a handlebars template and lays
//!   the text out into an in-memory PDF.
//!
//! Both refuse an empty result set with [`ReportError::Empty`].

mod document;
mod error;
mod row;
mod tabular;

pub use document::{ReportMeta, render_pdf};
pub use error::ReportError;
pub use row::ReportRow;
pub use tabular::{StagedFile, render_csv};
