//! Writes finished exam reports into an output directory.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use examsim_core::report::ExamReport;
use examsim_core::traits::ResultSink;

use crate::html::write_html_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Html,
}

impl ReportFormat {
    /// Parse a `--format` value: `json`, `html`, `all`, `none`, or a comma list.
    pub fn parse_list(s: &str) -> Result<Vec<ReportFormat>> {
        match s.trim() {
            "all" => Ok(vec![ReportFormat::Json, ReportFormat::Html]),
            "none" | "" => Ok(vec![]),
            list => list
                .split(',')
                .map(|f| f.parse().map_err(|e: String| anyhow::anyhow!(e)))
                .collect(),
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Saves each report as `report-<timestamp>-<id prefix>.<ext>` per configured
/// format, so exams ending in the same second get separate files.
pub struct FileResultSink {
    dir: PathBuf,
    formats: Vec<ReportFormat>,
}

impl FileResultSink {
    pub fn new(dir: impl Into<PathBuf>, formats: Vec<ReportFormat>) -> Self {
        Self {
            dir: dir.into(),
            formats,
        }
    }
}

impl ResultSink for FileResultSink {
    fn name(&self) -> &str {
        "file"
    }

    fn record(&self, report: &ExamReport) -> Result<Vec<String>> {
        let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
        let id = report.id.simple().to_string();
        let stem = format!("report-{timestamp}-{}", &id[..8]);
        let mut written = Vec::new();

        for format in &self.formats {
            let path = self.dir.join(format!("{stem}.{}", format.extension()));
            match format {
                ReportFormat::Json => report.save_json(&path)?,
                ReportFormat::Html => write_html_report(report, &path)?,
            }
            tracing::info!(path = %path.display(), "exam report saved");
            written.push(path.display().to_string());
        }

        Ok(written)
    }
}
