//! Application state and the exam state machine.
//!
//! One [`ExamController`] owns everything the user can change: bank load
//! status, selected mode, hint visibility, and the current phase. Front ends
//! translate input into [`Command`]s and render from the controller's
//! accessors.

use std::fmt;

use crate::error::SourceError;
use crate::model::{ExamMode, ModeTable, Question};
use crate::scoring::{self, DomainScore, ScoreResult};
use crate::session::ExamSession;

/// Where the question bank stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankStatus {
    Loading,
    Ready(usize),
    Failed(String),
}

impl BankStatus {
    /// Message to show the user, if the bank is not usable.
    pub fn message(&self) -> Option<String> {
        match self {
            BankStatus::Loading => Some("Question bank is still loading.".into()),
            BankStatus::Ready(_) => None,
            BankStatus::Failed(reason) => Some(format!("Question bank unavailable: {reason}")),
        }
    }
}

/// An exam that has been ended and scored.
#[derive(Debug, Clone)]
pub struct EndedExam {
    pub session: ExamSession,
    pub score: ScoreResult,
}

impl EndedExam {
    pub fn domain_breakdown(&self) -> Vec<DomainScore> {
        scoring::domain_breakdown(self.session.questions(), self.session.answers())
    }
}

/// Exam lifecycle.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    InProgress(ExamSession),
    Ended(EndedExam),
}

/// User intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectMode(ExamMode),
    ToggleHints,
    Start,
    Toggle(char),
    Next,
    Prev,
    End,
    RetakeIncorrect,
}

/// Why a command had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    NotInProgress,
    NotEnded,
    ModeLocked,
    NoSuchOption(char),
    AtBoundary,
    NothingToRetake,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ignored::NotInProgress => write!(f, "no exam in progress"),
            Ignored::NotEnded => write!(f, "no ended exam to retake"),
            Ignored::ModeLocked => write!(f, "mode cannot change during an exam"),
            Ignored::NoSuchOption(letter) => write!(f, "this question has no option {letter}"),
            Ignored::AtBoundary => write!(f, "no question in that direction"),
            Ignored::NothingToRetake => write!(f, "every question was answered correctly"),
        }
    }
}

/// Result of dispatching a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Scored(ScoreResult),
    Ignored(Ignored),
}

/// Single owner of the simulator state.
#[derive(Debug, Clone)]
pub struct ExamController {
    modes: ModeTable,
    bank: Vec<Question>,
    bank_status: BankStatus,
    mode: ExamMode,
    show_hints: bool,
    phase: Phase,
}

impl ExamController {
    pub fn new(modes: ModeTable, mode: ExamMode, show_hints: bool) -> Self {
        Self {
            modes,
            bank: Vec::new(),
            bank_status: BankStatus::Loading,
            mode,
            show_hints,
            phase: Phase::NotStarted,
        }
    }

    /// Consume the result of the question bank fetch.
    ///
    /// A failure leaves the bank empty and records a message for the user.
    pub fn on_bank_loaded(&mut self, result: Result<Vec<Question>, SourceError>) {
        match result {
            Ok(questions) => {
                tracing::info!(questions = questions.len(), "question bank loaded");
                self.bank_status = BankStatus::Ready(questions.len());
                self.bank = questions;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load question bank");
                self.bank_status = BankStatus::Failed(e.to_string());
                self.bank.clear();
            }
        }
    }

    pub fn bank(&self) -> &[Question] {
        &self.bank
    }

    pub fn bank_status(&self) -> &BankStatus {
        &self.bank_status
    }

    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    pub fn mode(&self) -> ExamMode {
        self.mode
    }

    pub fn show_hints(&self) -> bool {
        self.show_hints
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&ExamSession> {
        match &self.phase {
            Phase::InProgress(session) => Some(session),
            _ => None,
        }
    }

    pub fn ended(&self) -> Option<&EndedExam> {
        match &self.phase {
            Phase::Ended(ended) => Some(ended),
            _ => None,
        }
    }

    /// Score of the active or ended exam, recomputed on every call.
    pub fn score(&self) -> Option<ScoreResult> {
        let session = match &self.phase {
            Phase::InProgress(session) => session,
            Phase::Ended(ended) => &ended.session,
            Phase::NotStarted => return None,
        };
        Some(scoring::score(session.questions(), session.answers()))
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        match command {
            Command::SelectMode(mode) => self.select_mode(mode),
            Command::ToggleHints => {
                self.show_hints = !self.show_hints;
                Outcome::Applied
            }
            Command::Start => {
                self.start_exam();
                Outcome::Applied
            }
            Command::Toggle(letter) => self.toggle(letter),
            Command::Next => self.navigate(ExamSession::next),
            Command::Prev => self.navigate(ExamSession::prev),
            Command::End => self.end_exam(),
            Command::RetakeIncorrect => self.retake_incorrect(),
        }
    }

    pub fn select_mode(&mut self, mode: ExamMode) -> Outcome {
        if matches!(self.phase, Phase::InProgress(_)) {
            return Outcome::Ignored(Ignored::ModeLocked);
        }
        self.mode = mode;
        Outcome::Applied
    }

    /// Replace whatever phase we are in with a fresh session.
    pub fn start_exam(&mut self) {
        let config = self.modes.get(self.mode);
        let session = ExamSession::start(&self.bank, self.mode, config);
        tracing::info!(
            mode = %self.mode,
            questions = session.len(),
            minutes = config.minutes,
            "exam started"
        );
        self.phase = Phase::InProgress(session);
    }

    fn toggle(&mut self, letter: char) -> Outcome {
        let Phase::InProgress(session) = &mut self.phase else {
            return Outcome::Ignored(Ignored::NotInProgress);
        };
        let letter = letter.to_ascii_uppercase();
        if !session.current().is_some_and(|q| q.has_option(letter)) {
            return Outcome::Ignored(Ignored::NoSuchOption(letter));
        }
        session.toggle_current(letter);
        Outcome::Applied
    }

    fn navigate(&mut self, step: fn(&mut ExamSession) -> bool) -> Outcome {
        let Phase::InProgress(session) = &mut self.phase else {
            return Outcome::Ignored(Ignored::NotInProgress);
        };
        if step(session) {
            Outcome::Applied
        } else {
            Outcome::Ignored(Ignored::AtBoundary)
        }
    }

    pub fn end_exam(&mut self) -> Outcome {
        match std::mem::take(&mut self.phase) {
            Phase::InProgress(session) => {
                let score = scoring::score(session.questions(), session.answers());
                tracing::info!(
                    total = score.total,
                    correct = score.correct,
                    percent = score.percent,
                    "exam ended"
                );
                self.phase = Phase::Ended(EndedExam { session, score });
                Outcome::Scored(score)
            }
            other => {
                self.phase = other;
                Outcome::Ignored(Ignored::NotInProgress)
            }
        }
    }

    /// Start a new session from the questions missed in the ended exam.
    pub fn retake_incorrect(&mut self) -> Outcome {
        let Phase::Ended(ended) = &self.phase else {
            return Outcome::Ignored(Ignored::NotEnded);
        };
        let missed =
            scoring::incorrect_questions(ended.session.questions(), ended.session.answers());
        if missed.is_empty() {
            return Outcome::Ignored(Ignored::NothingToRetake);
        }
        let session =
            ExamSession::with_questions(missed, ended.session.mode(), ended.session.minutes());
        tracing::info!(questions = session.len(), "retake started");
        self.phase = Phase::InProgress(session);
        Outcome::Applied
    }
}
