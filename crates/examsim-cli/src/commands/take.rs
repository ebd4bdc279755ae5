//! The `examsim take` command: the interactive exam loop.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use examsim_core::controller::{Command, ExamController, Outcome};
use examsim_core::model::ExamMode;
use examsim_core::report::ExamReport;
use examsim_core::traits::ResultSink;
use examsim_report::{FileResultSink, ReportFormat};
use examsim_source::load_config_from;

use crate::render;

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Command(Command),
    Toggles(Vec<char>),
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    let lower = line.to_ascii_lowercase();
    let mut words = lower.split_whitespace();
    let first = words.next().unwrap_or_default();

    let command = match first {
        "start" | "s" => Command::Start,
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "end" => Command::End,
        "retake" | "r" => Command::RetakeIncorrect,
        "hints" | "h" => Command::ToggleHints,
        "status" => return Input::Status,
        "help" | "?" => return Input::Help,
        "quit" | "q" | "exit" => return Input::Quit,
        "mode" => {
            return match words.next().map(str::parse::<ExamMode>) {
                Some(Ok(mode)) => Input::Command(Command::SelectMode(mode)),
                _ => Input::Unknown(line.to_string()),
            }
        }
        _ => return parse_toggles(line),
    };
    Input::Command(command)
}

/// `a`, `a c`, `A,C`: every token must be a single letter.
fn parse_toggles(line: &str) -> Input {
    let mut letters = Vec::new();
    for token in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => letters.push(c.to_ascii_uppercase()),
            _ => return Input::Unknown(line.to_string()),
        }
    }
    Input::Toggles(letters)
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    mode: Option<String>,
    hints: bool,
    bank_file: Option<PathBuf>,
    url: Option<String>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    super::override_source(&mut config, bank_file, url);

    let mode = match mode {
        Some(m) => m.parse::<ExamMode>().map_err(anyhow::Error::msg)?,
        None => config.default_mode,
    };
    let formats = ReportFormat::parse_list(&format)?;
    let sink = FileResultSink::new(
        output.unwrap_or_else(|| config.output_dir.clone()),
        formats,
    );

    let mut controller =
        ExamController::new(config.modes.clone(), mode, hints || config.show_hints);

    eprintln!("Loading question bank...");
    controller.on_bank_loaded(super::fetch_bank(&config).await);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_loop(&mut controller, &sink, stdin.lock(), &mut stdout.lock())
}

/// Drive the controller from line-oriented input until `quit` or end of input.
fn run_loop<R: BufRead>(
    controller: &mut ExamController,
    sink: &dyn ResultSink,
    input: R,
    out: &mut dyn Write,
) -> Result<()> {
    render::setup(out, controller)?;

    for line in input.lines() {
        let line = line?;
        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => writeln!(out, "{}", render::HELP)?,
            Input::Status => render::status(out, controller)?,
            Input::Unknown(text) => {
                writeln!(out, "Unknown command `{text}`. Type `help` for commands.")?
            }
            Input::Command(command) => {
                let outcome = controller.dispatch(command);
                handle_outcome(controller, sink, &command, outcome, out)?;
            }
            Input::Toggles(letters) => {
                let mut ignored = Vec::new();
                for letter in letters {
                    if let Outcome::Ignored(reason) = controller.dispatch(Command::Toggle(letter)) {
                        ignored.push(reason);
                    }
                }
                for reason in &ignored {
                    writeln!(out, "({reason})")?;
                }
                if controller.session().is_some() {
                    render::question(out, controller, Utc::now())?;
                }
            }
        }
        out.flush()?;
    }
    Ok(())
}

fn handle_outcome(
    controller: &ExamController,
    sink: &dyn ResultSink,
    command: &Command,
    outcome: Outcome,
    out: &mut dyn Write,
) -> Result<()> {
    match outcome {
        Outcome::Ignored(reason) => writeln!(out, "({reason})")?,
        Outcome::Scored(_) => {
            let Some(ended) = controller.ended() else {
                return Ok(());
            };
            render::results(out, ended)?;
            let mode = controller.modes().get(ended.session.mode());
            let report = ExamReport::from_ended(ended, mode, Utc::now());
            match sink.record(&report) {
                Ok(paths) => {
                    for path in paths {
                        writeln!(out, "Report saved: {path}")?;
                    }
                }
                Err(e) => {
                    tracing::warn!(sink = sink.name(), error = %e, "failed to record results");
                    writeln!(out, "Could not save report: {e:#}")?;
                }
            }
        }
        Outcome::Applied => match command {
            Command::SelectMode(_) | Command::ToggleHints if controller.session().is_none() => {
                render::setup(out, controller)?
            }
            _ => render::question(out, controller, Utc::now())?,
        },
    }
    Ok(())
}
