use crate::cli::Cli;
use crate::commands::{effective_config, spinner, Result};
use crate::output::{format_output, OutputData};
use vidrank_core::{Pipeline, SummaryKind};

/// Summary or how-to guide for a single video.
pub async fn run(cli: &Cli, video: &str, kind: SummaryKind) -> Result<()> {
    let pipeline = Pipeline::from_config(effective_config(cli)?)?;

    let verb = match kind {
        SummaryKind::Summary => "Summarizing",
        SummaryKind::HowTo => "Writing a how-to for",
    };
    let progress = spinner(cli, format!("{} {}...", verb, video));
    let text = pipeline.summarize_video(video, kind).await;
    progress.finish_and_clear();

    let output = OutputData::Summary {
        video: video.to_string(),
        kind,
        text: text?,
    };
    format_output(&output, cli)
}
