// src/error.rs
use serde_json::json;

/// Fatal outcome of a pipeline invocation.
///
/// Per-candidate problems never surface here; they are recorded on the
/// report (see [`crate::models::DroppedCandidate`] and
/// [`crate::models::SummaryOutcome`]).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),
}

impl PipelineError {
    pub fn code_str(&self) -> &'static str {
        match self {
            PipelineError::Retrieval(_) => "retrieval_failed",
            PipelineError::Configuration(_) => "config_error",
            PipelineError::InvalidQuery(_) => "invalid_query",
            PipelineError::Summarization(_) => "summarization_failed",
        }
    }

    /// Structured form handed to callers; never carries a raw upstream payload.
    pub fn to_json(&self) -> serde_json::Value {
        let message = match self {
            PipelineError::Retrieval(msg)
            | PipelineError::Configuration(msg)
            | PipelineError::InvalidQuery(msg)
            | PipelineError::Summarization(msg) => msg.clone(),
        };

        json!({
            "error": {
                "code": self.code_str(),
                "message": message,
            }
        })
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}

/// Errors reported by a [`crate::catalog::Catalog`] implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("catalog rejected credentials: {0}")]
    Unauthorized(String),

    #[error("item not found: {0}")]
    NotFound(String),

    #[error("could not decode catalog response: {0}")]
    Decode(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

impl CatalogError {
    /// Errors after which no further lookup in the same query can succeed.
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            CatalogError::QuotaExhausted(_) | CatalogError::Unauthorized(_)
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout(err.to_string())
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Unavailable(err.to_string())
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TranscriptError {
    #[error("no transcript available for {0}")]
    Unavailable(String),

    #[error("transcript provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GeneratorError {
    #[error("generator returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("generator returned no text")]
    EmptyResponse,

    #[error("generator request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GeneratorError {
    fn from(err: reqwest::Error) -> Self {
        GeneratorError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed duration token '{token}': {reason}")]
pub struct DurationParseError {
    pub token: String,
    pub reason: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_json_has_code_and_message() {
        let err = PipelineError::Retrieval("quota exhausted".to_string());
        let value = err.to_json();
        assert_eq!(value["error"]["code"], "retrieval_failed");
        assert_eq!(value["error"]["message"], "quota exhausted");
    }

    #[test]
    fn abort_class_catalog_errors() {
        assert!(CatalogError::QuotaExhausted("daily".into()).is_abort());
        assert!(CatalogError::Unauthorized("keyInvalid".into()).is_abort());
        assert!(!CatalogError::NotFound("abc".into()).is_abort());
        assert!(!CatalogError::Timeout("10s".into()).is_abort());
    }

    #[test]
    fn config_error_converts_to_configuration() {
        let err: PipelineError = ConfigError::MissingCredential("YOUTUBE_API_KEY").into();
        assert_eq!(err.code_str(), "config_error");
    }
}
