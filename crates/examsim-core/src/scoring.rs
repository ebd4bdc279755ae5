//! Exam scoring.
//!
//! A question counts as correct only when the sorted selection equals the
//! sorted answer key and the selection size equals the question's required
//! count. Scores are derived on demand and never stored in the session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::session::AnswerTracker;

/// Aggregate result of an exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: usize,
    pub correct: usize,
    /// Rounded percentage, 0 for an empty exam.
    pub percent: u32,
}

impl ScoreResult {
    pub fn new(total: usize, correct: usize) -> Self {
        Self {
            total,
            correct,
            percent: rounded_percent(correct, total),
        }
    }
}

/// Score for one domain code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: String,
    #[serde(flatten)]
    pub score: ScoreResult,
}

/// `round(100 * correct / total)`, rounding halves up; 0 when `total` is 0.
pub fn rounded_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}

/// Whether the tracked selection earns credit for this question.
pub fn is_correct(question: &Question, answers: &AnswerTracker) -> bool {
    let selected: Vec<String> = answers
        .selected(question.id)
        .map(|letters| letters.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    selected == question.sorted_correct() && selected.len() == question.correct_count
}

/// Score a list of questions against the tracker.
pub fn score(questions: &[Question], answers: &AnswerTracker) -> ScoreResult {
    let correct = questions
        .iter()
        .filter(|q| is_correct(q, answers))
        .count();
    ScoreResult::new(questions.len(), correct)
}

/// Per-domain scores, sorted by domain code.
pub fn domain_breakdown(questions: &[Question], answers: &AnswerTracker) -> Vec<DomainScore> {
    let mut tallies: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for q in questions {
        let entry = tallies.entry(q.domain.as_str()).or_default();
        entry.0 += 1;
        if is_correct(q, answers) {
            entry.1 += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(domain, (total, correct))| DomainScore {
            domain: domain.to_string(),
            score: ScoreResult::new(total, correct),
        })
        .collect()
}

/// Questions the tracker does not earn credit for, in exam order.
pub fn incorrect_questions(questions: &[Question], answers: &AnswerTracker) -> Vec<Question> {
    questions
        .iter()
        .filter(|q| !is_correct(q, answers))
        .cloned()
        .collect()
}
