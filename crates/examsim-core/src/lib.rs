//! examsim-core: question bank normalization, exam sessions, and scoring.
//!
//! This crate defines the data model, the spreadsheet payload normalizer,
//! the exam session state machine, and the scorer that the rest of examsim
//! builds on.

pub mod controller;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod traits;
