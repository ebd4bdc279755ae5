//! Core data model types for examsim.
//!
//! Questions are built once from the spreadsheet payload and never mutated
//! afterwards; exam modes are static profiles fixed at process start.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Option letters in column order.
pub const OPTION_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// A single exam question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Zero-based row position in the loaded bank. Not stable across reloads.
    pub id: usize,
    /// Classification tag, e.g. "1.1".
    pub domain: String,
    /// Task label within the domain.
    #[serde(default)]
    pub task: String,
    /// Reference citation (code section, standard, ...).
    #[serde(default)]
    pub reference: String,
    /// The prompt text.
    pub text: String,
    /// Options with text, in letter order. Empty slots are omitted.
    pub options: Vec<AnswerOption>,
    /// Correct option letters as listed in the bank.
    pub correct: Vec<String>,
    /// Number of options that must be selected for credit.
    pub correct_count: usize,
    /// Optional hint, empty when absent.
    #[serde(default)]
    pub hint: String,
}

impl Question {
    /// Returns `true` if the question offers an option with this letter.
    pub fn has_option(&self, letter: char) -> bool {
        self.options.iter().any(|o| o.letter == letter)
    }

    /// Correct letters sorted, the way the scorer compares them.
    pub fn sorted_correct(&self) -> Vec<String> {
        let mut correct = self.correct.clone();
        correct.sort();
        correct
    }
}

/// One lettered answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub letter: char,
    pub text: String,
}

/// The two exam profiles a user can pick before starting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamMode {
    Half,
    #[default]
    Full,
}

impl ExamMode {
    pub const ALL: [ExamMode; 2] = [ExamMode::Half, ExamMode::Full];
}

impl fmt::Display for ExamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamMode::Half => write!(f, "half"),
            ExamMode::Full => write!(f, "full"),
        }
    }
}

impl FromStr for ExamMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "half" => Ok(ExamMode::Half),
            "full" => Ok(ExamMode::Full),
            other => Err(format!("unknown exam mode: {other} (expected half or full)")),
        }
    }
}

/// Question count and time allowance for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub label: String,
    pub questions: usize,
    pub minutes: u32,
}

/// The static mode profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTable {
    #[serde(default = "default_half")]
    pub half: ModeConfig,
    #[serde(default = "default_full")]
    pub full: ModeConfig,
}

fn default_half() -> ModeConfig {
    ModeConfig {
        label: "Half Exam".into(),
        questions: 55,
        minutes: 75,
    }
}

fn default_full() -> ModeConfig {
    ModeConfig {
        label: "Full Exam".into(),
        questions: 110,
        minutes: 150,
    }
}

impl Default for ModeTable {
    fn default() -> Self {
        Self {
            half: default_half(),
            full: default_full(),
        }
    }
}

impl ModeTable {
    pub fn get(&self, mode: ExamMode) -> &ModeConfig {
        match mode {
            ExamMode::Half => &self.half,
            ExamMode::Full => &self.full,
        }
    }
}

/// Declared per-domain weights. Shown to the user; exam assembly does not use them.
pub type DomainWeights = BTreeMap<String, f64>;

pub fn default_domain_weights() -> DomainWeights {
    [("1.1", 0.2), ("1.2", 0.3), ("1.3", 0.5)]
        .into_iter()
        .map(|(d, w)| (d.to_string(), w))
        .collect()
}
