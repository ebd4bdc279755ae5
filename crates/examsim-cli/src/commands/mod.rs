pub mod init;
pub mod modes;
pub mod review;
pub mod take;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use examsim_core::error::SourceError;
use examsim_core::model::Question;
use examsim_core::traits::QuestionSource;
use examsim_source::{create_source, ExamsimConfig, SourceConfig};

/// Apply `--bank-file` / `--url` on top of the configured source.
pub(crate) fn override_source(
    config: &mut ExamsimConfig,
    bank_file: Option<PathBuf>,
    url: Option<String>,
) {
    if let Some(path) = bank_file {
        config.source = SourceConfig::File { path };
    } else if let Some(url) = url {
        config.use_sheet_url(url);
    }
}

/// Fetch the question bank on its own task and hand back the typed result.
pub(crate) async fn fetch_bank(config: &ExamsimConfig) -> Result<Vec<Question>, SourceError> {
    let source: Arc<dyn QuestionSource> = Arc::from(create_source(config));
    tracing::info!(source = source.name(), "loading question bank");
    tokio::spawn(async move { source.fetch_questions().await })
        .await
        .unwrap_or_else(|e| Err(SourceError::Network(format!("fetch task failed: {e}"))))
}
