// src/catalog/youtube.rs

use super::{Catalog, ChannelDetail, SearchRequest, VideoDetail};
use crate::config::CatalogConfig;
use crate::error::{CatalogError, PipelineError};
use crate::models::RawCandidate;
use crate::utils::clean_html_entities;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

// Wire types for the Data API v3. Only the fields we read are declared.

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    published_at: DateTime<Utc>,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: Option<ContentDetails>,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    dislike_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    #[serde(default)]
    statistics: ChannelStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Catalog backed by the YouTube Data API v3.
#[derive(Clone)]
pub struct YouTubeCatalog {
    client: Client,
    api_key: String,
    base_url: String,
    region_code: Option<String>,
    relevance_language: Option<String>,
}

impl YouTubeCatalog {
    pub fn new(config: &CatalogConfig, call_timeout: Duration) -> Result<Self, PipelineError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::Configuration(
                    "catalog.api_key not set (or YOUTUBE_API_KEY)".to_string(),
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
            region_code: config.region_code.clone(),
            relevance_language: config.relevance_language.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let err = map_api_error(status.as_u16(), &body);
            tracing::debug!(target: "vidrank.youtube", endpoint, status = status.as_u16(), error = %err, "catalog request failed");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(format!("{}: {}", endpoint, e)))
    }
}

#[async_trait]
impl Catalog for YouTubeCatalog {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawCandidate>, CatalogError> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("order", "viewCount".to_string()),
            ("q", request.topic.clone()),
            ("maxResults", request.max_results.to_string()),
            ("videoDuration", request.duration_bucket.as_param().to_string()),
        ];
        if let Some(region) = &self.region_code {
            params.push(("regionCode", region.clone()));
        }
        if let Some(lang) = &self.relevance_language {
            params.push(("relevanceLanguage", lang.clone()));
        }

        let response: ListResponse<SearchItem> = self.get_json("search", &params).await?;
        Ok(candidates_from_search(response))
    }

    async fn video_detail(&self, catalog_id: &str) -> Result<VideoDetail, CatalogError> {
        let params = [
            ("part", "contentDetails,statistics".to_string()),
            ("id", catalog_id.to_string()),
        ];
        let response: ListResponse<VideoItem> = self.get_json("videos", &params).await?;
        detail_from_videos(catalog_id, response)
    }

    async fn channel_detail(&self, channel_id: &str) -> Result<ChannelDetail, CatalogError> {
        let params = [
            ("part", "statistics".to_string()),
            ("id", channel_id.to_string()),
        ];
        let response: ListResponse<ChannelItem> = self.get_json("channels", &params).await?;
        detail_from_channels(channel_id, response)
    }
}

fn candidates_from_search(response: ListResponse<SearchItem>) -> Vec<RawCandidate> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let catalog_id = item.id.video_id?;
            Some(RawCandidate {
                catalog_id,
                title: clean_html_entities(&item.snippet.title),
                channel_id: item.snippet.channel_id,
                channel_title: clean_html_entities(&item.snippet.channel_title),
                published_at: item.snippet.published_at,
            })
        })
        .collect()
}

fn detail_from_videos(
    catalog_id: &str,
    response: ListResponse<VideoItem>,
) -> Result<VideoDetail, CatalogError> {
    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| CatalogError::NotFound(catalog_id.to_string()))?;

    let duration_token = item
        .content_details
        .and_then(|c| c.duration)
        .ok_or_else(|| CatalogError::Decode(format!("{}: missing contentDetails.duration", catalog_id)))?;

    let stats = item.statistics;
    Ok(VideoDetail {
        duration_token,
        views: parse_count("viewCount", stats.view_count.as_deref())?,
        likes: parse_count("likeCount", stats.like_count.as_deref())?,
        dislikes: parse_count("dislikeCount", stats.dislike_count.as_deref())?,
        comments: parse_count("commentCount", stats.comment_count.as_deref())?,
    })
}

fn detail_from_channels(
    channel_id: &str,
    response: ListResponse<ChannelItem>,
) -> Result<ChannelDetail, CatalogError> {
    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| CatalogError::NotFound(channel_id.to_string()))?;
    Ok(ChannelDetail {
        subscribers: parse_count("subscriberCount", item.statistics.subscriber_count.as_deref())?,
    })
}

/// Statistics arrive as decimal strings; absent means 0.
fn parse_count(field: &str, raw: Option<&str>) -> Result<u64, CatalogError> {
    match raw {
        None => Ok(0),
        Some(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| CatalogError::Decode(format!("{} is not a count: {:?}", field, s))),
    }
}

fn map_api_error(status: u16, body: &str) -> CatalogError {
    let (message, reasons) = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(env) => (
            env.error.message,
            env.error
                .errors
                .into_iter()
                .map(|d| d.reason)
                .collect::<Vec<_>>(),
        ),
        Err(_) => (format!("HTTP {}", status), Vec::new()),
    };
    let has = |reason: &str| reasons.iter().any(|r| r == reason);

    match status {
        403 if has("quotaExceeded") || has("rateLimitExceeded") || has("dailyLimitExceeded") => {
            CatalogError::QuotaExhausted(message)
        }
        429 => CatalogError::QuotaExhausted(message),
        400 if has("keyInvalid") => CatalogError::Unauthorized(message),
        401 => CatalogError::Unauthorized(message),
        403 if has("forbidden") || has("accessNotConfigured") => CatalogError::Unauthorized(message),
        404 => CatalogError::NotFound(message),
        _ => CatalogError::Unavailable(format!("HTTP {}: {}", status, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_skips_non_video_hits_and_decodes_titles() {
        let raw = json!({
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "abc123"},
                    "snippet": {
                        "publishedAt": "2025-03-01T12:00:00Z",
                        "channelId": "UC1",
                        "title": "Python &amp; You: it&#39;s easy",
                        "channelTitle": "Teach &amp; Learn"
                    }
                },
                {
                    "id": {"kind": "youtube#channel", "channelId": "UC2"},
                    "snippet": {
                        "publishedAt": "2025-03-01T12:00:00Z",
                        "channelId": "UC2",
                        "title": "A channel",
                        "channelTitle": "A channel"
                    }
                }
            ]
        });
        let response: ListResponse<SearchItem> = serde_json::from_value(raw).unwrap();
        let candidates = candidates_from_search(response);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].catalog_id, "abc123");
        assert_eq!(candidates[0].title, "Python & You: it's easy");
        assert_eq!(candidates[0].channel_title, "Teach & Learn");
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let raw = json!({
            "items": [{
                "id": "abc123",
                "contentDetails": {"duration": "PT10M"},
                "statistics": {"viewCount": "1200", "likeCount": "40"}
            }]
        });
        let response: ListResponse<VideoItem> = serde_json::from_value(raw).unwrap();
        let detail = detail_from_videos("abc123", response).unwrap();
        assert_eq!(detail.duration_token, "PT10M");
        assert_eq!(detail.views, 1200);
        assert_eq!(detail.likes, 40);
        assert_eq!(detail.dislikes, 0);
        assert_eq!(detail.comments, 0);
    }

    #[test]
    fn empty_items_is_not_found() {
        let response: ListResponse<VideoItem> = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(matches!(
            detail_from_videos("gone", response),
            Err(CatalogError::NotFound(_))
        ));

        let response: ListResponse<ChannelItem> = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            detail_from_channels("UCx", response),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn hidden_subscriber_count_is_zero() {
        let raw = json!({"items": [{"statistics": {"hiddenSubscriberCount": true}}]});
        let response: ListResponse<ChannelItem> = serde_json::from_value(raw).unwrap();
        assert_eq!(detail_from_channels("UC1", response).unwrap().subscribers, 0);
    }

    #[test]
    fn garbage_counter_is_decode_error() {
        assert!(matches!(
            parse_count("viewCount", Some("lots")),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn maps_quota_and_key_errors() {
        let quota = json!({"error": {"code": 403, "message": "quota", "errors": [{"reason": "quotaExceeded"}]}});
        assert!(matches!(
            map_api_error(403, &quota.to_string()),
            CatalogError::QuotaExhausted(_)
        ));

        let bad_key = json!({"error": {"code": 400, "message": "API key not valid", "errors": [{"reason": "keyInvalid"}]}});
        let err = map_api_error(400, &bad_key.to_string());
        assert!(err.is_abort());

        assert!(matches!(
            map_api_error(503, "<html>oops</html>"),
            CatalogError::Unavailable(_)
        ));
    }

    #[test]
    fn requires_api_key() {
        let config = CatalogConfig::default();
        assert!(matches!(
            YouTubeCatalog::new(&config, Duration::from_secs(5)),
            Err(PipelineError::Configuration(_))
        ));
    }
}
