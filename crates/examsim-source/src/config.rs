//! Simulator configuration and source factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examsim_core::model::{default_domain_weights, DomainWeights, ExamMode, ModeTable};
use examsim_core::parser::NormalizeOptions;
use examsim_core::traits::QuestionSource;

use crate::file::FileSource;
use crate::sheet::{SheetSource, DEFAULT_SHEET_URL, DEFAULT_TIMEOUT_SECS};

/// Where the question bank comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Sheet {
        #[serde(default = "default_sheet_url")]
        url: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
    File {
        path: PathBuf,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Sheet {
            url: default_sheet_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_sheet_url() -> String {
    DEFAULT_SHEET_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level examsim configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamsimConfig {
    /// Mode preselected in the exam setup.
    #[serde(default)]
    pub default_mode: ExamMode,
    /// Whether hints start out visible.
    #[serde(default)]
    pub show_hints: bool,
    /// Drop all-empty sheet rows instead of defaulting them.
    #[serde(default)]
    pub skip_blank_rows: bool,
    /// Output directory for result reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Question bank source.
    #[serde(default)]
    pub source: SourceConfig,
    /// Question count and time allowance per mode.
    #[serde(default)]
    pub modes: ModeTable,
    /// Declared weight per domain code.
    #[serde(default = "default_domain_weights")]
    pub domain_weights: DomainWeights,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./examsim-results")
}

impl Default for ExamsimConfig {
    fn default() -> Self {
        Self {
            default_mode: ExamMode::default(),
            show_hints: false,
            skip_blank_rows: false,
            output_dir: default_output_dir(),
            source: SourceConfig::default(),
            modes: ModeTable::default(),
            domain_weights: default_domain_weights(),
        }
    }
}

impl ExamsimConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            skip_blank_rows: self.skip_blank_rows,
        }
    }

    /// Switch to a sheet source at `url`, keeping any configured timeout.
    pub fn use_sheet_url(&mut self, url: String) {
        let timeout_secs = match &self.source {
            SourceConfig::Sheet { timeout_secs, .. } => *timeout_secs,
            SourceConfig::File { .. } => default_timeout(),
        };
        self.source = SourceConfig::Sheet { url, timeout_secs };
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Sheet { url, timeout_secs } => SourceConfig::Sheet {
            url: resolve_env_vars(url),
            timeout_secs: *timeout_secs,
        },
        SourceConfig::File { path } => SourceConfig::File {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examsim.toml` in the current directory
/// 2. `~/.config/examsim/config.toml`
///
/// `EXAMSIM_QUESTION_URL` overrides the question source with that sheet URL.
pub fn load_config() -> Result<ExamsimConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamsimConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examsim.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExamsimConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamsimConfig::default(),
    };

    if let Ok(url) = std::env::var("EXAMSIM_QUESTION_URL") {
        config.use_sheet_url(url);
    }

    config.source = resolve_source_config(&config.source);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examsim"))
}

/// Create a question source from the configuration.
pub fn create_source(config: &ExamsimConfig) -> Box<dyn QuestionSource> {
    let options = config.normalize_options();
    match &config.source {
        SourceConfig::Sheet { url, timeout_secs } => {
            Box::new(SheetSource::new(url, *timeout_secs).with_options(options))
        }
        SourceConfig::File { path } => Box::new(FileSource::new(path).with_options(options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMSIM_TEST_VAR", "sheet-id");
        assert_eq!(resolve_env_vars("${_EXAMSIM_TEST_VAR}"), "sheet-id");
        assert_eq!(
            resolve_env_vars("https://x/d/${_EXAMSIM_TEST_VAR}/gviz/tq"),
            "https://x/d/sheet-id/gviz/tq"
        );
        std::env::remove_var("_EXAMSIM_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_EXAMSIM_SELF_REF", "${_EXAMSIM_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_EXAMSIM_SELF_REF}/b"),
            "a/${_EXAMSIM_SELF_REF}/b"
        );
        std::env::remove_var("_EXAMSIM_SELF_REF");

        assert_eq!(resolve_env_vars("${_EXAMSIM_UNSET_VAR}x"), "x");
        assert_eq!(resolve_env_vars("open ${brace"), "open ${brace");
    }

    #[test]
    fn default_config() {
        let config = ExamsimConfig::default();
        assert_eq!(config.default_mode, ExamMode::Full);
        assert!(!config.show_hints);
        assert_eq!(config.modes.half.questions, 55);
        assert_eq!(config.domain_weights.len(), 3);
        assert!(matches!(
            config.source,
            SourceConfig::Sheet { timeout_secs: 30, .. }
        ));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_mode = "half"
show_hints = true
skip_blank_rows = true
output_dir = "results"

[source]
type = "sheet"
url = "https://example.com/gviz/tq?tqx=out:json"
timeout_secs = 10

[modes.half]
label = "Practice"
questions = 20
minutes = 30

[domain_weights]
"1.1" = 0.25
"1.2" = 0.75
"#;
        let config: ExamsimConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_mode, ExamMode::Half);
        assert!(config.show_hints);
        assert!(config.normalize_options().skip_blank_rows);
        assert_eq!(config.modes.half.label, "Practice");
        assert_eq!(config.modes.full.questions, 110);
        assert_eq!(config.domain_weights.get("1.2"), Some(&0.75));
        assert_eq!(
            config.source,
            SourceConfig::Sheet {
                url: "https://example.com/gviz/tq?tqx=out:json".into(),
                timeout_secs: 10
            }
        );
    }

    #[test]
    fn parse_file_source() {
        let config: ExamsimConfig = toml::from_str(
            r#"
[source]
type = "file"
path = "question-banks/sample.gviz.txt"
"#,
        )
        .unwrap();
        assert!(matches!(config.source, SourceConfig::File { .. }));
        assert_eq!(create_source(&config).name(), "file");
    }

    #[test]
    fn sheet_url_override_keeps_timeout() {
        let mut config: ExamsimConfig = toml::from_str(
            r#"
[source]
type = "sheet"
timeout_secs = 5
"#,
        )
        .unwrap();
        config.use_sheet_url("http://localhost:8080/gviz/tq".into());
        assert_eq!(
            config.source,
            SourceConfig::Sheet {
                url: "http://localhost:8080/gviz/tq".into(),
                timeout_secs: 5
            }
        );

        config.source = SourceConfig::File {
            path: PathBuf::from("bank.txt"),
        };
        config.use_sheet_url("http://localhost:8080/gviz/tq".into());
        assert!(matches!(
            config.source,
            SourceConfig::Sheet { timeout_secs: 30, .. }
        ));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/examsim.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examsim.toml");
        std::fs::write(&path, "default_mode = \"half\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_mode, ExamMode::Half);
        assert_eq!(config.modes, ModeTable::default());
    }
}
