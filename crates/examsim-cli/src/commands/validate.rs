//! The `examsim validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examsim_core::parser::validate_bank;
use examsim_source::load_config_from;

pub async fn execute(
    bank_file: Option<PathBuf>,
    url: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    super::override_source(&mut config, bank_file, url);

    let questions = super::fetch_bank(&config).await?;
    println!("Question bank: {} questions", questions.len());

    let warnings = validate_bank(&questions, &config.domain_weights);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [q{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
