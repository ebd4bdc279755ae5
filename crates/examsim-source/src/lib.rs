//! examsim-source: question bank sources.
//!
//! Implements the `QuestionSource` trait for the published Google Sheet, a
//! saved payload on disk, and an in-memory mock, plus the configuration that
//! picks between them.

pub mod config;
pub mod file;
pub mod mock;
pub mod sheet;

pub use config::{create_source, load_config, load_config_from, ExamsimConfig, SourceConfig};
pub use examsim_core::error::SourceError;
