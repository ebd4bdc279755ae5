//! Spreadsheet payload normalizer.
//!
//! The question bank is a Google Sheets query response: a JSON table wrapped
//! in a `google.visualization.Query.setResponse(...)` callback. Each table row
//! becomes one [`Question`], with missing cells filled from [`COLUMN_POLICY`].

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::model::{AnswerOption, DomainWeights, Question, OPTION_LETTERS};

/// Text that precedes the JSON payload.
pub const ENVELOPE_PREFIX: &str = "google.visualization.Query.setResponse(";

/// Fixed column layout of the question sheet.
pub mod col {
    pub const DOMAIN: usize = 0;
    pub const TASK: usize = 1;
    pub const REFERENCE: usize = 2;
    pub const PROMPT: usize = 3;
    pub const OPTION_A: usize = 4;
    pub const CORRECT: usize = 9;
    pub const REQUIRED_COUNT: usize = 10;
    pub const HINT: usize = 11;
}

/// What a missing cell turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Substitute this text.
    Text(&'static str),
    /// Leave the field out (used for option slots).
    Omit,
}

/// Default rule for one sheet column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRule {
    pub index: usize,
    pub name: &'static str,
    pub fallback: Fallback,
}

/// Per-column defaults, indexed by column position.
#[rustfmt::skip]
pub const COLUMN_POLICY: [ColumnRule; 12] = [
    ColumnRule { index: col::DOMAIN, name: "domain", fallback: Fallback::Text("1.1") },
    ColumnRule { index: col::TASK, name: "task", fallback: Fallback::Text("") },
    ColumnRule { index: col::REFERENCE, name: "reference", fallback: Fallback::Text("") },
    ColumnRule { index: col::PROMPT, name: "prompt", fallback: Fallback::Text("") },
    ColumnRule { index: 4, name: "option A", fallback: Fallback::Omit },
    ColumnRule { index: 5, name: "option B", fallback: Fallback::Omit },
    ColumnRule { index: 6, name: "option C", fallback: Fallback::Omit },
    ColumnRule { index: 7, name: "option D", fallback: Fallback::Omit },
    ColumnRule { index: 8, name: "option E", fallback: Fallback::Omit },
    ColumnRule { index: col::CORRECT, name: "correct", fallback: Fallback::Text("A") },
    ColumnRule { index: col::REQUIRED_COUNT, name: "required count", fallback: Fallback::Text("1") },
    ColumnRule { index: col::HINT, name: "hint", fallback: Fallback::Text("") },
];

/// Normalization switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Drop rows whose cells are all empty instead of defaulting every field.
    pub skip_blank_rows: bool,
}

#[derive(Debug, Deserialize)]
struct GvizResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<GvizIssue>,
    #[serde(default)]
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizIssue {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    detailed_message: String,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    rows: Option<Vec<GvizRow>>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Value,
}

/// Locate the JSON inside the callback wrapper.
///
/// The payload runs from the end of [`ENVELOPE_PREFIX`] to the last `)` in
/// the text, so a leading `/*O_o*/` comment and a trailing `;` are tolerated.
pub fn extract_envelope(text: &str) -> Result<&str, ParseError> {
    let start = text
        .find(ENVELOPE_PREFIX)
        .ok_or(ParseError::MissingEnvelope)?
        + ENVELOPE_PREFIX.len();
    let rest = &text[start..];
    let end = rest.rfind(')').ok_or(ParseError::MissingEnvelope)?;
    Ok(&rest[..end])
}

/// Normalize a raw payload with the default policy.
pub fn normalize(text: &str) -> Result<Vec<Question>, ParseError> {
    normalize_with(text, &NormalizeOptions::default())
}

/// Normalize a raw payload into questions, in row order.
pub fn normalize_with(text: &str, options: &NormalizeOptions) -> Result<Vec<Question>, ParseError> {
    let json = extract_envelope(text)?;
    let response: GvizResponse = serde_json::from_str(json)?;

    if response.status.as_deref() == Some("error") {
        let message = response
            .errors
            .iter()
            .map(|e| {
                [&e.detailed_message, &e.message, &e.reason]
                    .into_iter()
                    .find(|s| !s.is_empty())
                    .cloned()
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ParseError::SourceStatus { message });
    }

    let rows = response
        .table
        .and_then(|t| t.rows)
        .ok_or(ParseError::MissingTable)?;

    let mut questions = Vec::with_capacity(rows.len());
    for (id, row) in rows.iter().enumerate() {
        let cells = RowCells(&row.c);
        if options.skip_blank_rows && cells.is_blank() {
            tracing::warn!(row = id, "skipping blank question row");
            continue;
        }
        questions.push(cells.to_question(id));
    }

    tracing::debug!(
        rows = rows.len(),
        questions = questions.len(),
        "normalized question bank"
    );
    Ok(questions)
}

struct RowCells<'a>(&'a [Option<GvizCell>]);

impl RowCells<'_> {
    fn raw(&self, index: usize) -> Option<String> {
        self.0
            .get(index)
            .and_then(|cell| cell.as_ref())
            .and_then(|cell| cell_text(&cell.v))
    }

    /// Cell text with the column's fallback applied.
    fn field(&self, index: usize) -> Option<String> {
        self.raw(index).or_else(|| match COLUMN_POLICY[index].fallback {
            Fallback::Text(text) => Some(text.to_string()),
            Fallback::Omit => None,
        })
    }

    fn text(&self, index: usize) -> String {
        self.field(index).unwrap_or_default()
    }

    fn is_blank(&self) -> bool {
        (0..COLUMN_POLICY.len()).all(|i| self.raw(i).is_none())
    }

    fn to_question(&self, id: usize) -> Question {
        let options = OPTION_LETTERS
            .iter()
            .enumerate()
            .filter_map(|(offset, &letter)| {
                self.field(col::OPTION_A + offset)
                    .map(|text| AnswerOption { letter, text })
            })
            .collect();

        let mut correct = split_letters(&self.text(col::CORRECT));
        if correct.is_empty() {
            correct = split_letters(default_text(col::CORRECT));
        }

        let correct_count = leading_count(&self.text(col::REQUIRED_COUNT))
            .or_else(|| leading_count(default_text(col::REQUIRED_COUNT)))
            .unwrap_or(1);

        Question {
            id,
            domain: self.text(col::DOMAIN),
            task: self.text(col::TASK),
            reference: self.text(col::REFERENCE),
            text: self.text(col::PROMPT),
            options,
            correct,
            correct_count,
            hint: self.text(col::HINT),
        }
    }
}

fn default_text(index: usize) -> &'static str {
    match COLUMN_POLICY[index].fallback {
        Fallback::Text(text) => text,
        Fallback::Omit => "",
    }
}

/// Render a cell value as text; `None` means the cell counts as missing.
///
/// Numeric zero and `false` are missing too, so they take the column default.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15) {
                Some(format!("{}", f as i64))
            } else {
                Some(n.to_string())
            }
        }
        other => Some(other.to_string()),
    }
}

fn split_letters(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading decimal digits of the trimmed text, if any.
fn leading_count(text: &str) -> Option<usize> {
    let trimmed = text.trim();
    let digits: &str = &trimmed[..trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len())];
    digits.parse().ok()
}

/// A problem found in a loaded bank. The bank is still usable.
#[derive(Debug, Clone)]
pub struct BankWarning {
    /// The question ID, or `None` for bank-wide warnings.
    pub question_id: Option<usize>,
    pub message: String,
}

/// Check a bank for data problems the normalizer does not reject.
pub fn validate_bank(questions: &[Question], weights: &DomainWeights) -> Vec<BankWarning> {
    let mut warnings = Vec::new();

    if questions.is_empty() {
        warnings.push(BankWarning {
            question_id: None,
            message: "question bank is empty".into(),
        });
    }

    let mut unweighted = HashSet::new();
    for q in questions {
        let mut warn = |message: String| {
            warnings.push(BankWarning {
                question_id: Some(q.id),
                message,
            })
        };

        if q.options.is_empty() {
            warn("question has no options".into());
        }

        if q.text.trim().is_empty() {
            warn("prompt is empty".into());
        }

        for letter in &q.correct {
            let offered = letter.chars().count() == 1
                && letter.chars().next().is_some_and(|c| q.has_option(c));
            if !offered {
                warn(format!("correct letter '{letter}' is not among the options"));
            }
        }

        if q.correct.len() != q.correct_count {
            warn(format!(
                "{} correct letter(s) listed but {} selection(s) required",
                q.correct.len(),
                q.correct_count
            ));
        }

        if !weights.contains_key(&q.domain) && unweighted.insert(q.domain.clone()) {
            warn(format!("domain '{}' has no configured weight", q.domain));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_domain_weights;

    fn wrap(json: &str) -> String {
        format!("/*O_o*/\ngoogle.visualization.Query.setResponse({json});")
    }

    const SAMPLE: &str = r#"{"version":"0.6","reqId":"0","status":"ok","table":{"cols":[],"rows":[
        {"c":[{"v":"1.2"},{"v":"Sprinkler layout"},{"v":"NFPA 13 8.6.2"},{"v":"Maximum spacing?"},
              {"v":"12 ft"},{"v":"15 ft"},{"v":"18 ft"},null,null,{"v":"B"},{"v":"1"},{"v":"Standard spray, light hazard"}]},
        {"c":[{"v":1.1},null,null,{"v":"Pick two"},{"v":"One"},{"v":""},{"v":"Three"},{"v":"Four"},{"v":"Five"},{"v":"A, C"},{"v":2.0}]}
    ]}}"#;

    #[test]
    fn extract_envelope_strips_wrapper() {
        let text = wrap(r#"{"a":(1)}"#);
        assert_eq!(extract_envelope(&text).unwrap(), r#"{"a":(1)}"#);
    }

    #[test]
    fn missing_envelope_is_an_error() {
        let err = normalize(r#"{"table":{"rows":[]}}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingEnvelope));

        let err = normalize("google.visualization.Query.setResponse(").unwrap_err();
        assert!(matches!(err, ParseError::MissingEnvelope));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = normalize(&wrap("{not json")).unwrap_err();
        assert!(matches!(err, ParseError::MalformedJson(_)));
    }

    #[test]
    fn missing_table_is_an_error() {
        let err = normalize(&wrap(r#"{"status":"ok"}"#)).unwrap_err();
        assert!(matches!(err, ParseError::MissingTable));
    }

    #[test]
    fn source_status_error_is_reported() {
        let payload = wrap(
            r#"{"status":"error","errors":[{"reason":"access_denied","message":"Access denied","detailed_message":"Sheet is private"}]}"#,
        );
        let err = normalize(&payload).unwrap_err();
        assert!(err.to_string().contains("Sheet is private"));
    }

    #[test]
    fn rows_map_to_questions_in_order() {
        let questions = normalize(&wrap(SAMPLE)).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, 0);
        assert_eq!(questions[1].id, 1);

        let q = &questions[0];
        assert_eq!(q.domain, "1.2");
        assert_eq!(q.task, "Sprinkler layout");
        assert_eq!(q.reference, "NFPA 13 8.6.2");
        assert_eq!(q.options.len(), 3);
        assert_eq!(q.options[2].letter, 'C');
        assert_eq!(q.correct, vec!["B"]);
        assert_eq!(q.correct_count, 1);
        assert_eq!(q.hint, "Standard spray, light hazard");
    }

    #[test]
    fn missing_cells_use_column_defaults() {
        let questions = normalize(&wrap(SAMPLE)).unwrap();
        let q = &questions[1];
        // Numeric domain renders as text, empty option B is omitted.
        assert_eq!(q.domain, "1.1");
        assert_eq!(q.task, "");
        assert_eq!(q.reference, "");
        let letters: Vec<char> = q.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['A', 'C', 'D', 'E']);
        assert_eq!(q.correct, vec!["A", "C"]);
        assert_eq!(q.correct_count, 2);
        assert_eq!(q.hint, "");
    }

    #[test]
    fn empty_row_gets_every_default() {
        let questions = normalize(&wrap(r#"{"table":{"rows":[{"c":[]}]}}"#)).unwrap();
        let q = &questions[0];
        assert_eq!(q.domain, "1.1");
        assert!(q.options.is_empty());
        assert_eq!(q.correct, vec!["A"]);
        assert_eq!(q.correct_count, 1);
    }

    #[test]
    fn non_numeric_count_defaults_to_one() {
        let json = r#"{"table":{"rows":[
            {"c":[null,null,null,null,null,null,null,null,null,null,{"v":"two"}]},
            {"c":[null,null,null,null,null,null,null,null,null,null,{"v":"3 answers"}]}
        ]}}"#;
        let questions = normalize(&wrap(json)).unwrap();
        assert_eq!(questions[0].correct_count, 1);
        assert_eq!(questions[1].correct_count, 3);
    }

    #[test]
    fn zero_and_false_cells_take_defaults() {
        let json = r#"{"table":{"rows":[
            {"c":[{"v":0},null,null,{"v":"Q"},{"v":"Yes"},{"v":false},null,null,null,{"v":false},{"v":0},{"v":0.0}]},
            {"c":[null,null,null,{"v":"Q"},{"v":"Yes"},null,null,null,null,null,{"v":"0"}]}
        ]}}"#;
        let questions = normalize(&wrap(json)).unwrap();
        let q = &questions[0];
        assert_eq!(q.domain, "1.1");
        assert_eq!(q.options.len(), 1);
        assert_eq!(q.correct, vec!["A"]);
        assert_eq!(q.correct_count, 1);
        assert!(q.hint.is_empty());

        // Text "0" is present, so it is parsed rather than defaulted.
        assert_eq!(questions[1].correct_count, 0);
    }

    #[test]
    fn blank_correct_column_falls_back() {
        let json = r#"{"table":{"rows":[{"c":[null,null,null,null,null,null,null,null,null,{"v":" , "}]}]}}"#;
        let questions = normalize(&wrap(json)).unwrap();
        assert_eq!(questions[0].correct, vec!["A"]);
    }

    #[test]
    fn skip_blank_rows_keeps_row_positions() {
        let json = r#"{"table":{"rows":[{"c":[null,{"v":""}]},{"c":[{"v":"1.3"},null,null,{"v":"Q"}]}]}}"#;
        let strict = NormalizeOptions {
            skip_blank_rows: true,
        };
        let questions = normalize_with(&wrap(json), &strict).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, 1);

        assert_eq!(normalize(&wrap(json)).unwrap().len(), 2);
    }

    #[test]
    fn policy_table_is_indexed_by_column() {
        for (i, rule) in COLUMN_POLICY.iter().enumerate() {
            assert_eq!(rule.index, i, "rule for {} is out of place", rule.name);
        }
    }

    #[test]
    fn validate_reports_inconsistent_answer_keys() {
        let json = r#"{"table":{"rows":[
            {"c":[{"v":"1.1"},null,null,{"v":"Q"},{"v":"a"},{"v":"b"},null,null,null,{"v":"A,C"},{"v":"1"}]},
            {"c":[{"v":"9.9"},null,null,{"v":""}]}
        ]}}"#;
        let questions = normalize(&wrap(json)).unwrap();
        let warnings = validate_bank(&questions, &default_domain_weights());

        let for_q0: Vec<_> = warnings
            .iter()
            .filter(|w| w.question_id == Some(0))
            .collect();
        assert!(for_q0.iter().any(|w| w.message.contains("'C'")));
        assert!(for_q0.iter().any(|w| w.message.contains("selection(s) required")));

        let for_q1: Vec<_> = warnings
            .iter()
            .filter(|w| w.question_id == Some(1))
            .collect();
        assert!(for_q1.iter().any(|w| w.message.contains("no options")));
        assert!(for_q1.iter().any(|w| w.message.contains("prompt is empty")));
        assert!(for_q1.iter().any(|w| w.message.contains("'9.9'")));
    }

    #[test]
    fn validate_empty_bank() {
        let warnings = validate_bank(&[], &default_domain_weights());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].question_id.is_none());
    }
}
