// src/lib.rs
//! Topic-driven video discovery and ranking.
//!
//! [`Pipeline`] retrieves candidates for a topic from a [`Catalog`], enriches
//! them with engagement statistics, filters by recency and duration, scores
//! them with a [`ScoringPolicy`] and returns the top-K, optionally with a
//! transcript summary per finalist.

pub mod catalog;
pub mod config;
pub mod duration;
pub mod error;
pub mod generator;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod transcript;
pub mod utils;

pub use catalog::{Catalog, ChannelDetail, SearchRequest, VideoDetail, YouTubeCatalog};
pub use config::{load_config, Credentials, VidrankConfig};
pub use error::{
    CatalogError, ConfigError, DurationParseError, GeneratorError, PipelineError, TranscriptError,
};
pub use generator::{Generator, OpenAiGenerator};
pub use models::{
    DroppedCandidate, EngagementSignals, FailureKind, Query, RankReport, RankedVideo,
    RawCandidate, RunStats, SummaryKind, SummaryOutcome,
};
pub use pipeline::Pipeline;
pub use scoring::{RatioAmplified, ScoringPolicy, WeightedSum};
pub use transcript::{TranscriptProvider, TranscriptSegment};
#[cfg(feature = "transcripts")]
pub use transcript::YtTranscriptProvider;
