//! YouTube Data API v3 client.
//!
//! Only two read-only endpoints are used: `videos.list` for statistics and
//! `search.list` for date-bounded searches. Responses are mapped into
//! [`VideoStats`] here so the rest of the crate never sees the wire schema.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Upper bound on a single API call.
pub const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum ids accepted by one `videos.list` call.
pub const MAX_BATCH_IDS: usize = 50;

/// Maximum `maxResults` accepted by `search.list`.
pub const MAX_SEARCH_RESULTS: u32 = 50;

/// Engagement metrics for one video. Missing counters are reported as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStats {
    pub video_id: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub title: Option<String>,
    pub published_at: Option<String>,
}

/// Parameters of one `search.list` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub max_results: u32,
    pub published_before: Option<String>,
    pub published_after: Option<String>,
}

/// The statistics provider. Implemented by [`YouTubeClient`] and by fakes in tests.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Look up statistics for up to [`MAX_BATCH_IDS`] ids. Unknown ids are
    /// simply absent from the result.
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoStats>, ApiError>;

    /// Search for videos, newest first. Returns video ids.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, ApiError>;
}

#[async_trait]
impl<T: VideoApi + ?Sized> VideoApi for Arc<T> {
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoStats>, ApiError> {
        (**self).list_videos(ids).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, ApiError> {
        (**self).search(query).await
    }
}

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(API_TIMEOUT)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("API call: {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(ApiError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (reason, message) = parse_error_body(&body);
            return Err(ApiError::Status {
                status,
                reason,
                message,
            });
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoStats>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("part", "snippet,statistics".to_string()),
            ("id", ids.join(",")),
        ];
        let response: VideoListResponse = self.get("videos", &params).await?;

        Ok(response.items.into_iter().map(VideoStats::from).collect())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, ApiError> {
        let mut params = vec![
            ("part", "id,snippet".to_string()),
            ("q", query.query.clone()),
            ("maxResults", query.max_results.to_string()),
            ("order", "date".to_string()),
            ("type", "video".to_string()),
        ];
        if let Some(before) = &query.published_before {
            params.push(("publishedBefore", before.clone()));
        }
        if let Some(after) = &query.published_after {
            params.push(("publishedAfter", after.clone()));
        }

        let response: SearchListResponse = self.get("search", &params).await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }
}

// Wire types

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Option<Snippet>,
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    published_at: Option<String>,
}

/// Counters arrive as decimal strings and may be hidden by the uploader.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default, deserialize_with = "lenient_count")]
    view_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    like_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    comment_count: u64,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

impl From<VideoItem> for VideoStats {
    fn from(item: VideoItem) -> Self {
        let stats = item.statistics.unwrap_or_default();
        let (title, published_at) = match item.snippet {
            Some(snippet) => (snippet.title, snippet.published_at),
            None => (None, None),
        };

        VideoStats {
            video_id: item.id,
            view_count: stats.view_count,
            like_count: stats.like_count,
            comment_count: stats.comment_count,
            title,
            published_at,
        }
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    })
}

fn parse_error_body(body: &str) -> (String, String) {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => {
            let reason = parsed
                .error
                .errors
                .into_iter()
                .map(|detail| detail.reason)
                .find(|reason| !reason.is_empty())
                .unwrap_or_else(|| "unknown".to_string());
            (reason, parsed.error.message)
        }
        Err(_) => ("unknown".to_string(), body.trim().to_string()),
    }
}
