//! Configuration.
//!
//! Everything the pipeline needs is carried by one [`VidrankConfig`] value
//! built at startup and passed into constructors. Every field has a default,
//! so a missing file simply yields the defaults. Credentials may live in the
//! file or be supplied once by the binary via [`Credentials`].

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CATALOG_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_GENERATOR_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GENERATOR_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_CANDIDATES: u32 = 15;
pub const DEFAULT_CHAR_BUDGET: usize = 10_240;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_DEADLINE_MS: u64 = 30_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VidrankConfig {
    pub catalog: CatalogConfig,
    pub generator: GeneratorConfig,
    pub transcripts: TranscriptConfig,
    pub scoring: ScoringConfig,
    pub fanout: FanoutConfig,
    pub query: QueryDefaults,
}

/// Server-side length bucket applied to catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    #[default]
    Any,
    /// Under four minutes
    Short,
    /// Four to twenty minutes
    Medium,
    /// Over twenty minutes
    Long,
}

impl DurationBucket {
    pub fn as_param(&self) -> &'static str {
        match self {
            DurationBucket::Any => "any",
            DurationBucket::Short => "short",
            DurationBucket::Medium => "medium",
            DurationBucket::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_candidates: u32,
    pub duration_bucket: DurationBucket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_language: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_CATALOG_URL.to_string(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            duration_bucket: DurationBucket::Any,
            region_code: None,
            relevance_language: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GENERATOR_URL.to_string(),
            model: DEFAULT_GENERATOR_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub languages: Vec<String>,
    /// Characters of transcript kept before prompting.
    pub char_budget: usize,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            char_budget: DEFAULT_CHAR_BUDGET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicyKind {
    #[default]
    Ratio,
    Weighted,
}

impl std::str::FromStr for ScoringPolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ratio" => Ok(ScoringPolicyKind::Ratio),
            "weighted" | "weighted_sum" => Ok(ScoringPolicyKind::Weighted),
            other => Err(ConfigError::Invalid {
                field: "scoring.policy",
                reason: format!("unknown policy '{}', expected ratio or weighted", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
    pub subscribers: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            views: 0.5,
            likes: 0.3,
            comments: 0.1,
            subscribers: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub policy: ScoringPolicyKind,
    /// Exponent applied to the approval ratio by the `ratio` policy.
    pub exponent: i32,
    /// Weights used by the `weighted` policy.
    pub weights: SignalWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: ScoringPolicyKind::Ratio,
            exponent: 3,
            weights: SignalWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanoutConfig {
    /// Maximum external calls in flight per stage.
    pub max_in_flight: usize,
    pub call_timeout_ms: u64,
    /// Aggregate budget for one pipeline invocation.
    pub deadline_ms: u64,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            deadline_ms: DEFAULT_DEADLINE_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    pub recency_window_years: u32,
    pub result_limit: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            recency_window_years: 2,
            result_limit: crate::models::DEFAULT_RESULT_LIMIT,
        }
    }
}

/// API keys gathered once at process start.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub youtube_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Credentials {
    pub const YOUTUBE_ENV: &'static str = "YOUTUBE_API_KEY";
    pub const OPENAI_ENV: &'static str = "OPENAI_API_KEY";

    pub fn from_env() -> Self {
        fn var(key: &str) -> Option<String> {
            std::env::var(key)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }
        Self {
            youtube_api_key: var(Self::YOUTUBE_ENV),
            openai_api_key: var(Self::OPENAI_ENV),
        }
    }
}

fn fill_key(slot: &mut Option<String>, fallback: Option<String>) {
    if slot.as_deref().map_or(true, |k| k.trim().is_empty()) {
        *slot = fallback;
    }
}

impl VidrankConfig {
    /// Default location: `~/.config/vidrank/config.toml`.
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("vidrank").join("config.toml")
    }

    /// Keys already present in the file win over supplied credentials.
    /// A blank key counts as absent.
    pub fn with_credentials(mut self, creds: Credentials) -> Self {
        fill_key(&mut self.catalog.api_key, creds.youtube_api_key);
        fill_key(&mut self.generator.api_key, creds.openai_api_key);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=20).contains(&self.catalog.max_candidates) {
            return Err(ConfigError::Invalid {
                field: "catalog.max_candidates",
                reason: format!("{} is outside 10..=20", self.catalog.max_candidates),
            });
        }
        if !(1..=32).contains(&self.fanout.max_in_flight) {
            return Err(ConfigError::Invalid {
                field: "fanout.max_in_flight",
                reason: format!("{} is outside 1..=32", self.fanout.max_in_flight),
            });
        }
        if self.fanout.call_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "fanout.call_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.fanout.deadline_ms < self.fanout.call_timeout_ms {
            return Err(ConfigError::Invalid {
                field: "fanout.deadline_ms",
                reason: "must be >= fanout.call_timeout_ms".to_string(),
            });
        }
        if self.transcripts.char_budget == 0 {
            return Err(ConfigError::Invalid {
                field: "transcripts.char_budget",
                reason: "must be > 0".to_string(),
            });
        }
        if self.query.result_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "query.result_limit",
                reason: "must be >= 1".to_string(),
            });
        }
        if self.scoring.exponent < 0 {
            return Err(ConfigError::Invalid {
                field: "scoring.exponent",
                reason: "must be >= 0".to_string(),
            });
        }
        let w = &self.scoring.weights;
        if [w.views, w.likes, w.comments, w.subscribers]
            .iter()
            .any(|x| !x.is_finite() || *x < 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "scoring.weights",
                reason: "weights must be finite and non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// Copy with API keys replaced by a mask, for display.
    pub fn masked(&self) -> Self {
        let mut out = self.clone();
        let mask = |k: &mut Option<String>| {
            if k.is_some() {
                *k = Some("***".to_string());
            }
        };
        mask(&mut out.catalog.api_key);
        mask(&mut out.generator.api_key);
        out
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Read and validate a config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<VidrankConfig, ConfigError> {
    let config = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<VidrankConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(target: "vidrank.config", path = %path.display(), "config file not found, using defaults");
            VidrankConfig::default()
        }
        Err(e) => return Err(e.into()),
    };
    config.validate()?;
    Ok(config)
}
