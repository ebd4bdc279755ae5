//! Exam assembly, answer tracking, and in-session navigation.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};

use crate::model::{ExamMode, ModeConfig, Question};

/// Selected option letters per question ID.
///
/// Accepts any toggle; how many letters a question needs is only checked
/// when scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerTracker {
    selections: HashMap<usize, BTreeSet<char>>,
}

impl AnswerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the letter if absent, remove it if present.
    pub fn toggle(&mut self, question_id: usize, letter: char) {
        let selected = self.selections.entry(question_id).or_default();
        if !selected.remove(&letter) {
            selected.insert(letter);
        }
    }

    /// Letters currently selected for a question, sorted.
    pub fn selected(&self, question_id: usize) -> Option<&BTreeSet<char>> {
        self.selections.get(&question_id)
    }

    pub fn is_selected(&self, question_id: usize, letter: char) -> bool {
        self.selected(question_id)
            .is_some_and(|letters| letters.contains(&letter))
    }

    /// Number of questions with at least one letter selected.
    pub fn answered_count(&self) -> usize {
        self.selections.values().filter(|s| !s.is_empty()).count()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }
}

/// Take the first `config.questions` questions of the bank.
///
/// A bank shorter than the mode asks for yields the whole bank.
pub fn assemble(bank: &[Question], config: &ModeConfig) -> Vec<Question> {
    let take = config.questions.min(bank.len());
    if take < config.questions {
        tracing::warn!(
            requested = config.questions,
            available = bank.len(),
            "question bank is smaller than the selected mode"
        );
    }
    bank[..take].to_vec()
}

/// An exam in progress.
#[derive(Debug, Clone)]
pub struct ExamSession {
    mode: ExamMode,
    minutes: u32,
    questions: Vec<Question>,
    index: usize,
    answers: AnswerTracker,
    started_at: DateTime<Utc>,
}

impl ExamSession {
    /// Start a fresh session over the mode's prefix of the bank.
    pub fn start(bank: &[Question], mode: ExamMode, config: &ModeConfig) -> Self {
        Self::with_questions(assemble(bank, config), mode, config.minutes)
    }

    /// Start a fresh session over an explicit question list.
    pub fn with_questions(questions: Vec<Question>, mode: ExamMode, minutes: u32) -> Self {
        Self {
            mode,
            minutes,
            questions,
            index: 0,
            answers: AnswerTracker::new(),
            started_at: Utc::now(),
        }
    }

    pub fn mode(&self) -> ExamMode {
        self.mode
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn answers(&self) -> &AnswerTracker {
        &self.answers
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The question at the current index. `None` only for an empty session.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn can_advance(&self) -> bool {
        self.index + 1 < self.questions.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    /// Move to the next question. No-op on the last one.
    pub fn next(&mut self) -> bool {
        if self.can_advance() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous question. No-op on the first one.
    pub fn prev(&mut self) -> bool {
        if self.can_go_back() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn toggle(&mut self, question_id: usize, letter: char) {
        self.answers.toggle(question_id, letter);
    }

    /// Toggle a letter on the current question.
    pub fn toggle_current(&mut self, letter: char) -> Option<usize> {
        let id = self.current()?.id;
        self.answers.toggle(id, letter);
        Some(id)
    }

    pub fn time_allowance(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }

    /// Allowance minus elapsed time, floored at zero.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        let remaining = self.time_allowance() - (now - self.started_at);
        remaining.max(Duration::zero())
    }

    pub fn is_overtime(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at > self.time_allowance()
    }

    #[cfg(test)]
    pub(crate) fn set_started_at(&mut self, started_at: DateTime<Utc>) {
        self.started_at = started_at;
    }
}
