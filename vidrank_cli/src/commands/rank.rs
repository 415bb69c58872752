use crate::cli::{Cli, RankArgs};
use crate::commands::{effective_config, spinner, Result};
use crate::output::{format_output, OutputData};
use vidrank_core::{Pipeline, Query, SummaryKind};

pub async fn run(cli: &Cli, args: &RankArgs) -> Result<()> {
    let mut config = effective_config(cli)?;
    if let Some(policy) = args.policy {
        config.scoring.policy = policy.into();
    }
    if let Some(exponent) = args.exponent {
        config.scoring.exponent = exponent;
    }

    let topic = args.topic();
    let query = Query::new(
        topic.clone(),
        args.years.unwrap_or(config.query.recency_window_years),
    )
    .with_limit(args.limit.unwrap_or(config.query.result_limit));

    let pipeline = Pipeline::from_config(config)?;
    let summary_kind = if args.howto {
        Some(SummaryKind::HowTo)
    } else if args.summaries {
        Some(SummaryKind::Summary)
    } else {
        None
    };

    let progress = spinner(cli, format!("Ranking videos for '{}'...", topic));
    let report = match summary_kind {
        Some(kind) => pipeline.rank_with_summaries(&query, kind).await,
        None => pipeline.rank(&query).await,
    };
    progress.finish_and_clear();

    let report = report?;
    tracing::debug!(
        ranked = report.items.len(),
        dropped = report.dropped.len(),
        "rank finished"
    );
    format_output(&OutputData::Ranking(report), cli)
}
