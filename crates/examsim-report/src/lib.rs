//! examsim-report: result review pages and the file-backed result sink.

pub mod html;
pub mod sink;

pub use sink::{FileResultSink, ReportFormat};
