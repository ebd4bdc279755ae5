//! Exam result report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::controller::EndedExam;
use crate::model::{ExamMode, ModeConfig};
use crate::scoring::{self, DomainScore, ScoreResult};

/// A finished exam, as recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub mode: ExamMode,
    pub mode_label: String,
    /// Time allowance in minutes.
    pub minutes: u32,
    /// Wall-clock seconds between start and end.
    pub elapsed_secs: u64,
    pub score: ScoreResult,
    pub domains: Vec<DomainScore>,
    pub questions: Vec<QuestionOutcome>,
}

/// How one question was answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub id: usize,
    pub domain: String,
    pub text: String,
    pub selected: Vec<char>,
    pub correct: Vec<String>,
    pub is_correct: bool,
}

impl ExamReport {
    /// Build a report from an ended exam, stamped `now`.
    pub fn from_ended(ended: &EndedExam, mode: &ModeConfig, now: DateTime<Utc>) -> Self {
        let session = &ended.session;
        let answers = session.answers();

        let questions = session
            .questions()
            .iter()
            .map(|q| QuestionOutcome {
                id: q.id,
                domain: q.domain.clone(),
                text: q.text.clone(),
                selected: answers
                    .selected(q.id)
                    .map(|letters| letters.iter().copied().collect())
                    .unwrap_or_default(),
                correct: q.sorted_correct(),
                is_correct: scoring::is_correct(q, answers),
            })
            .collect();

        let elapsed_secs = (now - session.started_at()).num_seconds().max(0) as u64;

        Self {
            id: Uuid::new_v4(),
            created_at: now,
            mode: session.mode(),
            mode_label: mode.label.clone(),
            minutes: session.minutes(),
            elapsed_secs,
            score: ended.score,
            domains: ended.domain_breakdown(),
            questions,
        }
    }

    /// Questions that did not earn credit.
    pub fn missed(&self) -> impl Iterator<Item = &QuestionOutcome> {
        self.questions.iter().filter(|q| !q.is_correct)
    }

    /// Whether the exam ran past its time allowance.
    pub fn overtime(&self) -> bool {
        self.elapsed_secs > u64::from(self.minutes) * 60
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ExamReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Command, ExamController};
    use crate::model::ModeTable;
    use crate::session::tests::{make_bank, make_question};

    fn ended_controller() -> ExamController {
        let mut bank = make_bank(3);
        bank[1] = make_question(1, &["B", "D"], 2);
        bank[2].domain = "1.2".into();

        let mut controller = ExamController::new(ModeTable::default(), ExamMode::Half, false);
        controller.on_bank_loaded(Ok(bank));
        controller.start_exam();
        controller.dispatch(Command::Toggle('A'));
        controller.dispatch(Command::Next);
        controller.dispatch(Command::Toggle('D'));
        controller.dispatch(Command::Toggle('B'));
        controller.dispatch(Command::Next);
        controller.dispatch(Command::Toggle('C'));
        controller.dispatch(Command::End);
        controller
    }

    #[test]
    fn report_from_ended_exam() {
        let controller = ended_controller();
        let ended = controller.ended().unwrap();
        let now = ended.session.started_at() + chrono::Duration::seconds(90);
        let report = ExamReport::from_ended(ended, &controller.modes().half, now);

        assert_eq!(report.mode, ExamMode::Half);
        assert_eq!(report.mode_label, "Half Exam");
        assert_eq!(report.elapsed_secs, 90);
        assert!(!report.overtime());
        assert_eq!(report.score, ScoreResult::new(3, 2));
        assert_eq!(report.questions[1].selected, vec!['B', 'D']);
        assert_eq!(report.domains.len(), 2);

        let missed: Vec<usize> = report.missed().map(|q| q.id).collect();
        assert_eq!(missed, vec![2]);
    }

    #[test]
    fn json_save_and_load() {
        let controller = ended_controller();
        let report =
            ExamReport::from_ended(controller.ended().unwrap(), &controller.modes().half, Utc::now());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        report.save_json(&path).unwrap();

        let loaded = ExamReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.score, report.score);
        assert_eq!(loaded.questions.len(), 3);
    }

    #[test]
    fn save_into_unwritable_parent_names_the_directory() {
        let controller = ended_controller();
        let report =
            ExamReport::from_ended(controller.ended().unwrap(), &controller.modes().half, Utc::now());

        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = report
            .save_json(&blocker.join("sub").join("report.json"))
            .unwrap_err();
        assert!(err.to_string().contains("failed to create"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ExamReport::load_json(&dir.path().join("nope.json")).is_err());
    }
}
