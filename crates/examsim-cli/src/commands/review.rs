//! The `examsim review` command.

use std::path::PathBuf;

use anyhow::Result;

use examsim_core::report::ExamReport;

use crate::render;

pub fn execute(report_path: PathBuf) -> Result<()> {
    let report = ExamReport::load_json(&report_path)?;
    render::report(&mut std::io::stdout().lock(), &report)
}
