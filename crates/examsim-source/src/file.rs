//! Saved query responses on disk.
//!
//! Useful offline and for tests: save the body of the sheet URL to a file and
//! point the source at it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use examsim_core::error::SourceError;
use examsim_core::model::Question;
use examsim_core::parser::{normalize_with, NormalizeOptions};
use examsim_core::traits::QuestionSource;

pub struct FileSource {
    path: PathBuf,
    options: NormalizeOptions,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: NormalizeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {e}", self.path.display())))?;
        Ok(normalize_with(&text, &self.options)?)
    }
}
