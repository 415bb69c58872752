//! Pretty formatter for terminal output.
//!
//! Ranked videos go in one table; summaries follow as wrapped, numbered
//! blocks so long text never stretches the table.

use super::OutputData;
use crate::commands::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::fmt::Write as _;
use vidrank_core::{RankReport, SummaryKind, SummaryOutcome};

/// Terminal width for formatting (default fallback)
const DEFAULT_WIDTH: usize = 80;

/// Indent for summary blocks (after number)
const BLOCK_INDENT: usize = 5;

/// Applies color only when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Paint {
    enabled: bool,
}

impl Paint {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn heading(&self, s: &str) -> String {
        if self.enabled {
            s.cyan().bold().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn dim(&self, s: &str) -> String {
        if self.enabled {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn good(&self, s: &str) -> String {
        if self.enabled {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn warn(&self, s: &str) -> String {
        if self.enabled {
            s.yellow().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn bad(&self, s: &str) -> String {
        if self.enabled {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn link(&self, s: &str) -> String {
        if self.enabled {
            s.blue().underline().to_string()
        } else {
            s.to_string()
        }
    }
}

pub fn render(data: &OutputData, paint: &Paint) -> Result<String> {
    let width = terminal_width();
    let out = match data {
        OutputData::Ranking(report) => format_ranking(report, paint, width),
        OutputData::Summary { video, kind, text } => format_summary(video, *kind, text, paint, width),
        OutputData::ConfigInfo {
            path,
            exists,
            config,
        } => {
            let mut out = String::new();
            let source = if *exists {
                path.clone()
            } else {
                format!("{} (not found, using defaults)", path)
            };
            let _ = writeln!(out, "{} {}", paint.dim("Config:"), source);
            out.push('\n');
            out.push_str(&config.to_toml()?);
            out
        }
        OutputData::ConfigPath { path, exists } => {
            let status = if *exists {
                paint.good("exists")
            } else {
                paint.warn("not created yet; run 'vidrank config init'")
            };
            format!("{}  {}\n", path, status)
        }
        OutputData::ConfigWritten { path } => {
            format!("{} {}\n", paint.good("Wrote"), path)
        }
    };
    Ok(out)
}

fn format_ranking(report: &RankReport, paint: &Paint, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} {}",
        paint.dim("Topic:"),
        paint.heading(&report.topic),
        paint.dim("policy:"),
        paint.good(&report.policy)
    );
    out.push('\n');

    if report.items.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            paint.warn("No videos matched the recency and length window.")
        );
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(width as u16);
        table.set_header(vec![
            Cell::new("#"),
            Cell::new("Title"),
            Cell::new("Channel"),
            Cell::new("Published"),
            Cell::new("Length"),
            Cell::new("Views"),
            Cell::new("Likes"),
            Cell::new("Score"),
        ]);
        for (i, item) in report.items.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(truncate_str(&item.title, 60)),
                Cell::new(truncate_str(&item.channel_title, 24)),
                Cell::new(item.published_at.format("%Y-%m-%d")),
                Cell::new(format_length(item.duration_seconds)).set_alignment(CellAlignment::Right),
                Cell::new(format_count(item.signals.views)).set_alignment(CellAlignment::Right),
                Cell::new(format_count(item.signals.likes)).set_alignment(CellAlignment::Right),
                Cell::new(format_score(item.score)).set_alignment(CellAlignment::Right),
            ]);
        }
        let _ = writeln!(out, "{}", table);
        out.push('\n');

        for (i, item) in report.items.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", i + 1, paint.link(&item.link));
            match &item.summary {
                Some(SummaryOutcome::Summary { text }) => {
                    out.push_str(&wrap_block(text, width));
                }
                Some(SummaryOutcome::Failed { message, .. }) => {
                    let _ = writeln!(
                        out,
                        "{}{}",
                        " ".repeat(BLOCK_INDENT),
                        paint.warn(&format!("no summary: {}", message))
                    );
                }
                None => {}
            }
        }
    }

    if !report.dropped.is_empty() {
        out.push('\n');
        let _ = writeln!(
            out,
            "{}",
            paint.warn(&format!("{} candidate(s) skipped:", report.dropped.len()))
        );
        for d in &report.dropped {
            let _ = writeln!(
                out,
                "  {} {}",
                d.catalog_id,
                paint.dim(&truncate_str(&d.message, width.saturating_sub(d.catalog_id.len() + 3)))
            );
        }
    }

    out.push('\n');
    let stats = &report.stats;
    let _ = writeln!(
        out,
        "{}",
        paint.dim(&format!(
            "{} retrieved, {} enriched, {} filtered out, {} ranked in {}ms",
            stats.retrieved, stats.enriched, stats.filtered_out, stats.ranked, stats.duration_ms
        ))
    );
    out
}

fn format_summary(video: &str, kind: SummaryKind, text: &str, paint: &Paint, width: usize) -> String {
    let label = match kind {
        SummaryKind::Summary => "Summary",
        SummaryKind::HowTo => "How-To",
    };
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", paint.heading(label), paint.dim(video));
    out.push('\n');
    out.push_str(&wrap_block(text, width));
    out
}

fn wrap_block(text: &str, width: usize) -> String {
    let indent = " ".repeat(BLOCK_INDENT);
    let options = textwrap::Options::new(width.saturating_sub(BLOCK_INDENT).max(20))
        .initial_indent(&indent)
        .subsequent_indent(&indent);
    let mut out = String::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            out.push('\n');
            continue;
        }
        for line in textwrap::wrap(paragraph, &options) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// `m:ss` or `h:mm:ss`.
fn format_length(seconds: u32) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Compact count: 950, 12.3K, 4.5M, 1.2B.
fn format_count(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];
    for (size, suffix) in UNITS {
        if n >= size {
            return format!("{:.1}{}", n as f64 / size as f64, suffix);
        }
    }
    n.to_string()
}

fn format_score(score: f64) -> String {
    if score.abs() >= 1_000.0 {
        format_count(score.round() as u64)
    } else {
        format!("{:.1}", score)
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    // Take first line only
    let first_line = s.lines().next().unwrap_or(s);

    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}
