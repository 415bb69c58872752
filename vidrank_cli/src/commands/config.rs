use crate::cli::{Cli, ConfigAction};
use crate::commands::{effective_config, CommandError, Result};
use crate::output::{format_output, OutputData};
use std::path::PathBuf;
use vidrank_core::VidrankConfig;

const CONFIG_HEADER: &str = "\
# vidrank configuration
#
# API keys may be set here or through the environment:
#   [catalog]   api_key = \"...\"   (or YOUTUBE_API_KEY)
#   [generator] api_key = \"...\"   (or OPENAI_API_KEY)
#
# scoring.policy: \"ratio\" (views x like-ratio^exponent) or \"weighted\"
# catalog.duration_bucket: any | short | medium | long

";

pub async fn run(cli: &Cli, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => show_path(cli),
        ConfigAction::Init { force } => init_config(cli, *force),
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(VidrankConfig::default_path)
}

fn show_config(cli: &Cli) -> Result<()> {
    let path = config_path(cli);
    let config = effective_config(cli)?;
    format_output(
        &OutputData::ConfigInfo {
            path: path.display().to_string(),
            exists: path.exists(),
            config: config.masked(),
        },
        cli,
    )
}

fn show_path(cli: &Cli) -> Result<()> {
    let path = config_path(cli);
    format_output(
        &OutputData::ConfigPath {
            path: path.display().to_string(),
            exists: path.exists(),
        },
        cli,
    )
}

fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = config_path(cli);
    if path.exists() && !force {
        return Err(CommandError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = default_file_contents()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "config written");

    format_output(
        &OutputData::ConfigWritten {
            path: path.display().to_string(),
        },
        cli,
    )
}

fn default_file_contents() -> Result<String> {
    Ok(format!("{}{}", CONFIG_HEADER, VidrankConfig::default().to_toml()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidrank_core::config::load_config;

    #[test]
    fn default_file_is_commented_and_loads() {
        let contents = default_file_contents().unwrap();
        assert!(contents.starts_with("# vidrank configuration"));

        let dir = std::env::temp_dir().join(format!("vidrank-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, &contents).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.catalog.max_candidates, 15);
        assert_eq!(loaded.fanout.max_in_flight, 8);
        assert!(loaded.catalog.api_key.is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
