use crate::cli::{Cli, OutputFormat};
use crate::commands::Result;
use serde::Serialize;
use vidrank_core::{RankReport, SummaryKind, SummaryOutcome, VidrankConfig};

mod pretty;
pub use pretty::Paint;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OutputData {
    Ranking(RankReport),
    Summary {
        video: String,
        kind: SummaryKind,
        text: String,
    },
    ConfigInfo {
        path: String,
        exists: bool,
        config: VidrankConfig,
    },
    ConfigPath {
        path: String,
        exists: bool,
    },
    ConfigWritten {
        path: String,
    },
}

pub fn format_output(data: &OutputData, cli: &Cli) -> Result<()> {
    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Text => {
            format_text_output(data)?;
        }
        OutputFormat::Pretty => {
            let paint = Paint::new(!cli.no_color);
            print!("{}", pretty::render(data, &paint)?);
        }
    }
    Ok(())
}

fn format_text_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::Ranking(report) => {
            for (i, item) in report.items.iter().enumerate() {
                println!(
                    "{}\t{:.0}\t{}\t{}",
                    i + 1,
                    item.score,
                    item.title,
                    item.link
                );
                match &item.summary {
                    Some(SummaryOutcome::Summary { text }) => {
                        for line in text.lines() {
                            println!("\t{}", line);
                        }
                    }
                    Some(SummaryOutcome::Failed { message, .. }) => {
                        println!("\t(no summary: {})", message);
                    }
                    None => {}
                }
            }
            for dropped in &report.dropped {
                eprintln!("dropped {}: {}", dropped.catalog_id, dropped.message);
            }
        }
        OutputData::Summary { text, .. } => {
            println!("{}", text);
        }
        OutputData::ConfigInfo { config, .. } => {
            print!("{}", config.to_toml()?);
        }
        OutputData::ConfigPath { path, .. } | OutputData::ConfigWritten { path } => {
            println!("{}", path);
        }
    }
    Ok(())
}
