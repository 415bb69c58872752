use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vidrank_core::config::ScoringPolicyKind;

#[derive(Parser)]
#[command(name = "vidrank")]
#[command(about = "vidrank - the best recent videos on a topic, ranked by engagement")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  vidrank rank \"python tutorial\"                 Top 3 from the last 2 years
  vidrank rank rust async --years 1 --limit 5    Wider list, shorter window
  vidrank rank \"sourdough\" --summaries           Add a transcript summary per video
  vidrank howto https://youtu.be/dQw4w9WgXcQ     Step-by-step guide from one video

\x1b[1;36mConfiguration:\x1b[0m
  vidrank config init                            Write a default config file
  vidrank config show                            Show the effective config (keys masked)
  YOUTUBE_API_KEY / OPENAI_API_KEY               Used when the file has no keys")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/vidrank/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank recent videos on a topic
    ///
    /// Searches the catalog, drops videos that are too old, shorter than a
    /// minute or an hour and longer, and ranks the rest by engagement.
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  vidrank rank \"python tutorial\"
  vidrank rank kubernetes --policy weighted --limit 5
  vidrank rank \"knife sharpening\" --howto --output json")]
    Rank(RankArgs),

    /// Summarize one video from its transcript
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  vidrank summarize dQw4w9WgXcQ
  vidrank summarize \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\"")]
    Summarize {
        /// Video id or YouTube URL
        video: String,
    },

    /// Turn one video's transcript into a numbered how-to guide
    Howto {
        /// Video id or YouTube URL
        video: String,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Topic to search for
    #[arg(required = true, num_args = 1..)]
    pub topic: Vec<String>,

    /// How many years back a video may be published
    #[arg(short, long)]
    pub years: Option<u32>,

    /// Number of videos to return
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Scoring policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Exponent applied to the like ratio (ratio policy)
    #[arg(long)]
    pub exponent: Option<i32>,

    /// Attach a transcript summary to every ranked video
    #[arg(short, long)]
    pub summaries: bool,

    /// Attach a how-to guide instead of a summary (implies --summaries)
    #[arg(long)]
    pub howto: bool,
}

impl RankArgs {
    pub fn topic(&self) -> String {
        self.topic.join(" ")
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration with keys masked
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Yaml,
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// views x like-ratio^n
    Ratio,
    /// Weighted sum of views, likes, comments and subscribers
    Weighted,
}

impl From<PolicyArg> for ScoringPolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Ratio => ScoringPolicyKind::Ratio,
            PolicyArg::Weighted => ScoringPolicyKind::Weighted,
        }
    }
}
