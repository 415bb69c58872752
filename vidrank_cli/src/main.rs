use clap::Parser;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, OutputFormat};
use commands::*;
use output::Paint;
use vidrank_core::SummaryKind;

fn init_tracing(verbose: u8) {
    let default_directives = if verbose > 0 {
        "vidrank_cli=debug,vidrank=debug"
    } else {
        "vidrank_cli=info,vidrank=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Rank(args) => rank::run(&cli, args).await,
        Commands::Summarize { video } => summarize::run(&cli, video, SummaryKind::Summary).await,
        Commands::Howto { video } => summarize::run(&cli, video, SummaryKind::HowTo).await,
        Commands::Config { action } => config::run(&cli, action).await,
    };

    if let Err(e) = result {
        match cli.output {
            OutputFormat::Json => println!("{}", e.to_json()),
            _ => {
                let paint = Paint::new(!cli.no_color);
                eprintln!("{}: {}", paint.bad("Error"), e);
            }
        }
        process::exit(1);
    }
}
