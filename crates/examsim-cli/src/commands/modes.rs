//! The `examsim modes` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use examsim_core::model::ExamMode;
use examsim_source::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["Mode", "Label", "Questions", "Minutes", "Default"]);
    for mode in ExamMode::ALL {
        let m = config.modes.get(mode);
        table.add_row(vec![
            mode.to_string(),
            m.label.clone(),
            m.questions.to_string(),
            m.minutes.to_string(),
            if mode == config.default_mode { "*" } else { "" }.to_string(),
        ]);
    }
    println!("{table}");

    if !config.domain_weights.is_empty() {
        let mut weights = Table::new();
        weights.set_header(vec!["Domain", "Weight"]);
        for (domain, weight) in &config.domain_weights {
            weights.add_row(vec![domain.clone(), format!("{weight:.2}")]);
        }
        println!("\n{weights}");
        println!("Domain weights are informational; exams take questions in bank order.");
    }

    Ok(())
}
