//! HTML results review.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::path::Path;

use anyhow::{Context, Result};

use examsim_core::report::ExamReport;
use examsim_core::scoring::DomainScore;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn letters(selected: &[char]) -> String {
    if selected.is_empty() {
        return "-".to_string();
    }
    selected
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generate an HTML review page from an exam report.
pub fn generate_html(report: &ExamReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>examsim results: {}</title>\n",
        html_escape(&report.mode_label)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Exam results</h1>\n");
    let overtime = if report.overtime() {
        " <span class=\"fail\">over time</span>"
    } else {
        ""
    };
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} questions | {} min allowed, {} min {} s used{} | {}</p>\n",
        html_escape(&report.mode_label),
        report.score.total,
        report.minutes,
        report.elapsed_secs / 60,
        report.elapsed_secs % 60,
        overtime,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\">{} / {} correct ({}%)</p>\n",
        report.score.correct, report.score.total, report.score.percent
    ));

    if !report.domains.is_empty() {
        html.push_str("<table class=\"summary\">\n");
        html.push_str(
            "<thead><tr><th>Domain</th><th>Questions</th><th>Correct</th><th>Percent</th></tr></thead>\n",
        );
        html.push_str("<tbody>\n");
        for d in &report.domains {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>\n",
                html_escape(&d.domain),
                d.score.total,
                d.score.correct,
                d.score.percent
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str(&generate_bar_chart(&report.domains));
    }
    html.push_str("</section>\n");

    // Per-question review
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str("<thead><tr><th>#</th><th>Domain</th><th>Question</th><th>Your answer</th><th>Correct answer</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, q) in report.questions.iter().enumerate() {
        let class = if q.is_correct { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            i + 1,
            html_escape(&q.domain),
            html_escape(&q.text),
            letters(&q.selected),
            html_escape(&q.correct.join(", "))
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML review page, creating parent directories as needed.
pub fn write_html_report(report: &ExamReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, generate_html(report))
        .with_context(|| format!("failed to write report to {}", path.display()))
}

fn generate_bar_chart(domains: &[DomainScore]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 80;

    let total_height = domains.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, d) in domains.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = d.score.percent as usize * max_width / 100;

        let color = if d.score.percent >= 70 {
            "#22c55e"
        } else if d.score.percent >= 50 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&d.domain)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            d.score.percent
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --paper: #fdfdfb; --ink: #202124; --rule: #d6d3cb; --right: #e3f4e1; --wrong: #fbe4e1; --accent: #b3261e; }
@media (prefers-color-scheme: dark) {
  :root { --paper: #1b1c1e; --ink: #ececec; --rule: #3c3f44; --right: #1f3b24; --wrong: #4a1f1c; --accent: #f2b8b5; }
}
body { font-family: Georgia, 'Times New Roman', serif; max-width: 60rem; margin: 0 auto; padding: 2rem 1.5rem; background: var(--paper); color: var(--ink); }
header { border-bottom: 3px solid var(--accent); }
h2 { margin-top: 2.5rem; }
.meta { color: #767676; font-size: 0.9rem; }
.score { font-size: 1.75rem; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; font-family: system-ui, sans-serif; }
th, td { border-bottom: 1px solid var(--rule); padding: 0.4rem 0.75rem; text-align: left; vertical-align: top; }
th { border-bottom-width: 2px; }
.pass { background: var(--right); }
.fail { background: var(--wrong); }
svg { display: block; margin: 1.5rem 0; font-family: system-ui, sans-serif; }
"#;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use examsim_core::model::ExamMode;
    use examsim_core::report::QuestionOutcome;
    use examsim_core::scoring::ScoreResult;
    use uuid::Uuid;

    pub(crate) fn make_test_report() -> ExamReport {
        ExamReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            mode: ExamMode::Half,
            mode_label: "Half Exam".into(),
            minutes: 75,
            elapsed_secs: 95,
            score: ScoreResult::new(2, 1),
            domains: vec![DomainScore {
                domain: "1.2".into(),
                score: ScoreResult::new(2, 1),
            }],
            questions: vec![
                QuestionOutcome {
                    id: 0,
                    domain: "1.2".into(),
                    text: "Minimum pipe size <in>?".into(),
                    selected: vec!['A', 'C'],
                    correct: vec!["A".into(), "C".into()],
                    is_correct: true,
                },
                QuestionOutcome {
                    id: 1,
                    domain: "1.2".into(),
                    text: "Hanger spacing".into(),
                    selected: vec![],
                    correct: vec!["B".into()],
                    is_correct: false,
                },
            ],
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Half Exam"));
        assert!(html.contains("1 / 2 correct (50%)"));
        assert!(html.contains("Hanger spacing"));
        assert!(html.contains("<svg"));
        assert!(!html.contains("over time"));
    }

    #[test]
    fn question_text_is_escaped() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("Minimum pipe size &lt;in&gt;?"));
        assert!(!html.contains("<in>"));
    }

    #[test]
    fn unanswered_question_shows_dash() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("<td>Hanger spacing</td><td>-</td><td>B</td>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
