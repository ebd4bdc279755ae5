//! The `examsim init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("examsim.toml").exists() {
        println!("examsim.toml already exists, skipping.");
    } else {
        std::fs::write("examsim.toml", SAMPLE_CONFIG)?;
        println!("Created examsim.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit examsim.toml to point at your question sheet");
    println!("  2. Run: examsim validate");
    println!("  3. Run: examsim take --mode half");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examsim configuration

default_mode = "full"
show_hints = false
skip_blank_rows = false
output_dir = "./examsim-results"

[source]
type = "sheet"
url = "https://docs.google.com/spreadsheets/d/1rn9da6Co3oJJEvwzhTEiFQYoQAGAxFItUsVg14faik4/gviz/tq?tqx=out:json"
timeout_secs = 30

# Or load a saved response body from disk:
# [source]
# type = "file"
# path = "question-banks/sample.gviz.txt"

[modes.half]
label = "Half Exam"
questions = 55
minutes = 75

[modes.full]
label = "Full Exam"
questions = 110
minutes = 150

[domain_weights]
"1.1" = 0.2
"1.2" = 0.3
"1.3" = 0.5
"#;
