//! Terminal rendering of the exam screens.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};

use examsim_core::controller::{EndedExam, ExamController};
use examsim_core::model::ExamMode;
use examsim_core::report::ExamReport;
use examsim_core::scoring::{DomainScore, ScoreResult};

pub const HELP: &str = "\
Commands:
  start             start an exam in the selected mode
  mode half|full    select the exam mode (before starting)
  hints             show or hide hints
  a / a c / A,C     toggle options on the current question
  next, n           next question
  prev, p           previous question
  end               end the exam and score it
  retake            retake the questions you missed
  status            show bank, mode, and progress
  help              show this help
  quit              leave the simulator";

pub fn setup(out: &mut dyn Write, controller: &ExamController) -> Result<()> {
    match controller.bank_status().message() {
        Some(message) => writeln!(out, "{message}")?,
        None => writeln!(
            out,
            "Question bank ready: {} questions",
            controller.bank().len()
        )?,
    }
    writeln!(out)?;
    for mode in ExamMode::ALL {
        let config = controller.modes().get(mode);
        let marker = if mode == controller.mode() { "*" } else { " " };
        let name = mode.to_string();
        writeln!(
            out,
            " {marker} {name:<5} {} ({} questions, {} min)",
            config.label, config.questions, config.minutes
        )?;
    }
    writeln!(
        out,
        "Hints: {}",
        if controller.show_hints() { "on" } else { "off" }
    )?;
    writeln!(out, "Type `start` to begin or `help` for commands.")?;
    Ok(())
}

fn clock(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn question(out: &mut dyn Write, controller: &ExamController, now: DateTime<Utc>) -> Result<()> {
    let Some(session) = controller.session() else {
        return Ok(());
    };
    let Some(q) = session.current() else {
        writeln!(out, "This exam has no questions. Type `end` to score it.")?;
        return Ok(());
    };

    let remaining = session.time_remaining(now).num_seconds();
    let overtime = if session.is_overtime(now) {
        " (time is up)"
    } else {
        ""
    };
    writeln!(out)?;
    writeln!(
        out,
        "Question {} of {}   Time left {}{}",
        session.index() + 1,
        session.len(),
        clock(remaining),
        overtime
    )?;

    let meta: Vec<&str> = [q.domain.as_str(), q.task.as_str(), q.reference.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    writeln!(out, "[{}]", meta.join(" | "))?;
    writeln!(out, "{}", q.text)?;

    if controller.show_hints() && !q.hint.is_empty() {
        writeln!(out, "Hint: {}", q.hint)?;
    }

    for option in &q.options {
        let mark = if session.answers().is_selected(q.id, option.letter) {
            "x"
        } else {
            " "
        };
        writeln!(out, "  [{mark}] {}. {}", option.letter, option.text)?;
    }

    let mut nav = Vec::new();
    if session.can_go_back() {
        nav.push("prev");
    }
    if session.can_advance() {
        nav.push("next");
    }
    nav.push("end");
    writeln!(
        out,
        "Select {} option(s). {}",
        q.correct_count,
        nav.join(" | ")
    )?;
    Ok(())
}

fn domain_table(domains: &[DomainScore]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Domain", "Questions", "Correct", "Percent"]);
    for d in domains {
        table.add_row(vec![
            Cell::new(&d.domain),
            Cell::new(d.score.total),
            Cell::new(d.score.correct),
            Cell::new(format!("{}%", d.score.percent)),
        ]);
    }
    table
}

fn score_line(score: &ScoreResult) -> String {
    format!(
        "Total: {}, Correct: {}, Percent: {}%",
        score.total, score.correct, score.percent
    )
}

pub fn results(out: &mut dyn Write, ended: &EndedExam) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Results")?;
    writeln!(out, "{}", score_line(&ended.score))?;
    let domains = ended.domain_breakdown();
    if !domains.is_empty() {
        writeln!(out, "{}", domain_table(&domains))?;
    }
    writeln!(out, "Type `retake` to retry missed questions or `start` for a new exam.")?;
    Ok(())
}

pub fn status(out: &mut dyn Write, controller: &ExamController) -> Result<()> {
    match controller.bank_status().message() {
        Some(message) => writeln!(out, "{message}")?,
        None => writeln!(out, "Question bank: {} questions", controller.bank().len())?,
    }
    let config = controller.modes().get(controller.mode());
    writeln!(out, "Mode: {} ({})", config.label, controller.mode())?;
    if let Some(session) = controller.session() {
        writeln!(
            out,
            "Answered {} of {}, on question {}",
            session.answers().answered_count(),
            session.len(),
            (session.index() + 1).min(session.len())
        )?;
    } else if let Some(ended) = controller.ended() {
        writeln!(out, "Last exam: {}", score_line(&ended.score))?;
    } else {
        writeln!(out, "No exam started.")?;
    }
    Ok(())
}

pub fn report(out: &mut dyn Write, report: &ExamReport) -> Result<()> {
    writeln!(
        out,
        "{} taken {} ({} min allowed, {}:{:02} used{})",
        report.mode_label,
        report.created_at.format("%Y-%m-%d %H:%M UTC"),
        report.minutes,
        report.elapsed_secs / 60,
        report.elapsed_secs % 60,
        if report.overtime() { ", over time" } else { "" }
    )?;
    writeln!(out, "{}", score_line(&report.score))?;
    if !report.domains.is_empty() {
        writeln!(out, "{}", domain_table(&report.domains))?;
    }

    let missed: Vec<_> = report.missed().collect();
    if missed.is_empty() {
        writeln!(out, "No missed questions.")?;
    } else {
        writeln!(out, "\nMissed questions:")?;
        for q in missed {
            let selected = if q.selected.is_empty() {
                "-".to_string()
            } else {
                q.selected.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
            };
            writeln!(
                out,
                "  [{}] {} (you: {}, correct: {})",
                q.domain,
                q.text,
                selected,
                q.correct.join(",")
            )?;
        }
    }
    Ok(())
}
