//! Collaborator traits.
//!
//! `QuestionSource` is implemented by the `examsim-source` crate, and
//! `ResultSink` by `examsim-report`.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::Question;
use crate::report::ExamReport;

/// Somewhere a question bank can be loaded from.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Short name for logs (e.g. "sheet").
    fn name(&self) -> &str;

    /// Load and normalize the full question bank.
    async fn fetch_questions(&self) -> Result<Vec<Question>, SourceError>;
}

/// Somewhere finished exam results are recorded.
pub trait ResultSink: Send + Sync {
    fn name(&self) -> &str;

    /// Record a report, returning a description of each location written.
    fn record(&self, report: &ExamReport) -> anyhow::Result<Vec<String>>;
}
