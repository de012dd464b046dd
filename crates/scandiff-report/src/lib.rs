//! scandiff-report: Renders comparison results as a multi-sheet workbook.
//!
//! Sections are written through the [`ReportSink`] trait so the pipeline
//! never deals with worksheet mechanics. The same crate reads the
//! "Current scan results" sheet of an earlier report back in as a
//! previous snapshot.

pub mod error;
pub mod prior;
pub mod section;
pub mod sink;
pub mod xlsx;

pub use error::ReportError;
pub use prior::read_prior_report;
pub use section::Section;
pub use sink::{MemorySink, ReportSink};
pub use xlsx::XlsxSink;
