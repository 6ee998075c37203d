use std::future::Future;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

// Fields requested for every video
pub const VIDEO_PARTS: &str = "snippet,contentDetails";

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to YouTube API failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("YouTube API responded with status {status}")]
    Status { status: u16, body: Option<Value> },

    #[error("YouTube API returned malformed JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

impl UpstreamError {
    // Upstream error payload when one came back, otherwise the message text
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Status {
                body: Some(body), ..
            } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

// Error bodies are relayed as JSON when they parse, as raw text otherwise.
// Empty, null and other falsy payloads count as no payload at all.
fn error_payload(text: String) -> Option<Value> {
    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
    let empty = match &body {
        Value::Null | Value::Bool(false) => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        _ => false,
    };
    (!empty).then_some(body)
}

// Anything that can answer a `videos` lookup
pub trait VideoSource {
    fn fetch_videos(
        &self,
        video_ids: &str,
        api_key: &str,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send;
}

pub struct YouTubeClient {
    http_client: Client,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn videos_url(&self) -> String {
        format!("{}/videos", self.base_url)
    }
}

impl VideoSource for YouTubeClient {
    // `video_ids` goes out untouched; the API splits on commas itself
    async fn fetch_videos(&self, video_ids: &str, api_key: &str) -> Result<Value, UpstreamError> {
        let response = self
            .http_client
            .get(self.videos_url())
            .query(&[("part", VIDEO_PARTS), ("id", video_ids), ("key", api_key)])
            .send()
            .await
            // The request URL carries the key; keep it out of every message
            .map_err(|err| UpstreamError::Transport(err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().and_then(error_payload);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| UpstreamError::Decode(err.without_url()))
    }
}
