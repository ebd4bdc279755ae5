//! Error types for loading a question bank.
//!
//! `SourceError` lives here rather than in `examsim-source` so the controller
//! can consume a fetch result without depending on any particular source.

use thiserror::Error;

/// Failures while turning a raw payload into questions.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The `setResponse(...)` wrapper was not found in the payload.
    #[error("response is not wrapped in google.visualization.Query.setResponse(...)")]
    MissingEnvelope,

    /// The wrapped text is not valid JSON.
    #[error("malformed JSON payload: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The payload itself reports a query failure.
    #[error("data source reported an error: {message}")]
    SourceStatus { message: String },

    /// The payload has no `table.rows` array.
    #[error("payload has no table rows")]
    MissingTable,
}

/// Failures while loading a question bank from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The endpoint answered with a non-2xx status.
    #[error("question bank request failed (HTTP {status}): {message}")]
    RemoteFetch { status: u16, message: String },

    /// The endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A local payload file could not be read.
    #[error("failed to read question bank: {0}")]
    Io(String),

    /// The payload was fetched but could not be normalized.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SourceError {
    /// Returns `true` if retrying the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Network(_) | SourceError::Timeout(_) => true,
            SourceError::RemoteFetch { status, .. } => *status == 429 || *status >= 500,
            SourceError::Io(_) | SourceError::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(SourceError::Timeout(30).is_retryable());
        assert!(SourceError::Network("refused".into()).is_retryable());
        assert!(SourceError::RemoteFetch {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!SourceError::RemoteFetch {
            status: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!SourceError::Parse(ParseError::MissingEnvelope).is_retryable());
    }

    #[test]
    fn parse_error_message_passes_through() {
        let err = SourceError::from(ParseError::MissingTable);
        assert_eq!(err.to_string(), "payload has no table rows");
    }
}
