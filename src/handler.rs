use std::env;

use lambda_http::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_TYPE,
};
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Request, RequestExt, Response};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::ProxyError;
use crate::youtube::VideoSource;

const VIDEO_IDS_PARAM: &str = "videoIds";

pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";
pub const API_BASE_URL_VAR: &str = "YOUTUBE_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

pub const ALLOW_METHODS: &str = "GET,OPTIONS";
pub const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
     Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
}

impl Config {
    // Read once per Lambda container, then injected into the handler
    pub fn from_env() -> Self {
        Self::from_values(env::var(API_KEY_VAR).ok(), env::var(API_BASE_URL_VAR).ok())
    }

    // Empty values count as unset
    pub fn from_values(api_key: Option<String>, api_base_url: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.is_empty());
        let api_base_url = api_base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Self { api_key, api_base_url }
    }
}

// Permissive cross-origin headers, stamped on every response
fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

pub struct ProxyHandler<S> {
    config: Config,
    source: S,
}

impl<S: VideoSource> ProxyHandler<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }

    // One request in, exactly one response out; errors become JSON envelopes
    pub async fn handle(&self, request: Request) -> Response<Body> {
        let mut response = match self.process(&request).await {
            Ok(response) => response,
            Err(err) => error_response(&err),
        };
        apply_cors(response.headers_mut());
        response
    }

    async fn process(&self, request: &Request) -> Result<Response<Body>, ProxyError> {
        match *request.method() {
            Method::OPTIONS => return Ok(with_status(StatusCode::OK, Body::Empty)),
            Method::GET => {}
            _ => return Err(ProxyError::MethodNotAllowed),
        }

        // Caller input is checked before server configuration
        let params = request.query_string_parameters();
        let video_ids = params
            .first(VIDEO_IDS_PARAM)
            .filter(|ids| !ids.is_empty())
            .ok_or(ProxyError::MissingVideoIds)?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ProxyError::MissingApiKey)?;

        debug!(video_ids, "fetching video metadata");
        let payload = self
            .source
            .fetch_videos(video_ids, api_key)
            .await
            .map_err(|err| {
                error!(details = %err.details(), "YouTube API Error: {}", err);
                ProxyError::from(err)
            })?;

        Ok(json_response(StatusCode::OK, &payload))
    }
}

fn with_status(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

fn json_response(status: StatusCode, payload: &Value) -> Response<Body> {
    let mut response = with_status(status, Body::Text(payload.to_string()));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(err: &ProxyError) -> Response<Body> {
    let body = serde_json::to_value(err.envelope()).unwrap_or_else(|_| Value::Null);
    let mut response = json_response(err.status(), &body);
    if matches!(err, ProxyError::MethodNotAllowed) {
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET, OPTIONS"));
    }
    response
}
