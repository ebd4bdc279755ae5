//! Mock source for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use examsim_core::error::SourceError;
use examsim_core::model::Question;
use examsim_core::traits::QuestionSource;

/// An in-memory question source that serves a fixed bank or a fixed failure.
pub struct MockSource {
    questions: Vec<Question>,
    failure: Option<(u16, String)>,
    call_count: AtomicU32,
}

impl MockSource {
    /// Serve these questions on every call.
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions,
            failure: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Fail every call with an HTTP status.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            questions: Vec::new(),
            failure: Some((status, message.to_string())),
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuestionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, SourceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match &self.failure {
            Some((status, message)) => Err(SourceError::RemoteFetch {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(self.questions.clone()),
        }
    }
}
