//! Error types for the scandiff-report crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook read error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("{path} is not an .xlsx report")]
    UnsupportedFormat { path: String },

    #[error("Report {path} has no \"{section}\" sheet")]
    MissingSection { path: String, section: String },

    #[error("Report {path} does not start with the finding header at row {row}, found [{found}]")]
    LayoutMismatch {
        path: String,
        row: u32,
        found: String,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
