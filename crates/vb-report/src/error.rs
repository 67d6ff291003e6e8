use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("nothing to report: the result set is empty")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("template error: {0}")]
    Template(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
