pub mod config;
pub mod rank;
pub mod summarize;

use crate::cli::{Cli, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use thiserror::Error;
use vidrank_core::config::{load_config, Credentials, VidrankConfig};
use vidrank_core::error::{ConfigError, PipelineError};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CommandError {
    pub fn code_str(&self) -> &'static str {
        match self {
            CommandError::Pipeline(e) => e.code_str(),
            CommandError::Config(_) => "config_error",
            CommandError::InvalidInput(_) => "invalid_input",
            CommandError::Serialization(_) | CommandError::Yaml(_) => "serialization_error",
            CommandError::Io(_) => "io_error",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CommandError::Pipeline(e) => e.to_json(),
            other => json!({
                "error": {
                    "code": other.code_str(),
                    "message": other.to_string(),
                }
            }),
        }
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Effective config: file (or defaults) plus credentials from the environment.
pub fn effective_config(cli: &Cli) -> Result<VidrankConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(VidrankConfig::default_path);
    let config = load_config(&path)?.with_credentials(Credentials::from_env());
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Spinner on stderr for pretty output; hidden otherwise.
pub fn spinner(cli: &Cli, message: String) -> ProgressBar {
    if cli.output != OutputFormat::Pretty {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_keep_their_code() {
        let err: CommandError = PipelineError::InvalidQuery("topic must not be empty".into()).into();
        assert_eq!(err.code_str(), "invalid_query");
        assert_eq!(err.to_json()["error"]["message"], "topic must not be empty");
    }

    #[test]
    fn other_errors_render_json() {
        let err = CommandError::InvalidInput("already exists".into());
        let value = err.to_json();
        assert_eq!(value["error"]["code"], "invalid_input");
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("already exists"));
    }
}
