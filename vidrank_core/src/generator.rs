//! Text generation collaborator.
//!
//! [`OpenAiGenerator`] calls `POST {base_url}/chat/completions`. Error
//! payloads are reduced to their message before they leave this module.

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, PipelineError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for `prompt`, bounded to `max_tokens` of output.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GeneratorError>;
}

pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig, call_timeout: Duration) -> Result<Self, PipelineError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::Configuration(
                    "generator.api_key not set (or OPENAI_API_KEY)".to_string(),
                )
            })?;

        let client = Client::builder()
            .user_agent(concat!("vidrank/", env!("CARGO_PKG_VERSION")))
            .timeout(call_timeout)
            .build()
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn build_headers(&self) -> Result<HeaderMap, GeneratorError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| GeneratorError::Transport(e.to_string()))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GeneratorError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        let text = parse_completion(status, &payload)?;
        tracing::debug!(target: "vidrank.openai", model = %self.model, chars = text.len(), "completion received");
        Ok(text)
    }
}

fn parse_completion(status: u16, payload: &Value) -> Result<String, GeneratorError> {
    if let Some(err) = payload.get("error").filter(|e| !e.is_null()) {
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error")
            .to_string();
        return Err(GeneratorError::Upstream { status, message });
    }
    if !(200..300).contains(&status) {
        return Err(GeneratorError::Upstream {
            status,
            message: "unexpected status".to_string(),
        });
    }

    let text = payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| {
            c.pointer("/message/content")
                .or_else(|| c.get("text"))
                .and_then(|t| t.as_str())
        })
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GeneratorError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trimmed_message_content() {
        let payload = json!({"choices": [{"message": {"role": "assistant", "content": "  A tidy summary. \n"}}]});
        assert_eq!(parse_completion(200, &payload).unwrap(), "A tidy summary.");
    }

    #[test]
    fn accepts_legacy_text_field() {
        let payload = json!({"choices": [{"text": "legacy"}]});
        assert_eq!(parse_completion(200, &payload).unwrap(), "legacy");
    }

    #[test]
    fn maps_error_payload_to_message_only() {
        let payload = json!({"error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}});
        match parse_completion(429, &payload) {
            Err(GeneratorError::Upstream { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn empty_choices_is_error() {
        assert!(matches!(
            parse_completion(200, &json!({"choices": []})),
            Err(GeneratorError::EmptyResponse)
        ));
        assert!(matches!(
            parse_completion(502, &Value::Null),
            Err(GeneratorError::Upstream { status: 502, .. })
        ));
    }
}
