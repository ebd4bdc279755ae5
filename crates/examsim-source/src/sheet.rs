//! Google Sheets query endpoint.

use async_trait::async_trait;
use tracing::instrument;

use examsim_core::error::SourceError;
use examsim_core::model::Question;
use examsim_core::parser::{normalize_with, NormalizeOptions};
use examsim_core::traits::QuestionSource;

/// The published NICET IB-PSC question sheet.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1rn9da6Co3oJJEvwzhTEiFQYoQAGAxFItUsVg14faik4/gviz/tq?tqx=out:json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest response body quoted in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Loads the question bank with a single GET against a gviz query URL.
pub struct SheetSource {
    url: String,
    timeout_secs: u64,
    options: NormalizeOptions,
    client: reqwest::Client,
}

impl SheetSource {
    pub fn new(url: &str, timeout_secs: u64) -> Self {
        let url = if url.is_empty() {
            DEFAULT_SHEET_URL
        } else {
            url
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            url: url.to_string(),
            timeout_secs,
            options: NormalizeOptions::default(),
            client,
        }
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuestionSource for SheetSource {
    fn name(&self) -> &str {
        "sheet"
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_questions(&self) -> Result<Vec<Question>, SourceError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| message.is_char_boundary(i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            return Err(SourceError::RemoteFetch {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Network(format!("failed to read response body: {e}"))
            }
        })?;
        tracing::debug!(bytes = body.len(), "fetched question sheet");

        Ok(normalize_with(&body, &self.options)?)
    }
}
