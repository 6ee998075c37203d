use lambda_http::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::youtube::UpstreamError;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Video IDs are required")]
    MissingVideoIds,

    #[error("YouTube API key is not configured")]
    MissingApiKey,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to fetch video data")]
    Upstream(#[from] UpstreamError),
}

// JSON body sent back on every failure path
#[derive(Serialize, Debug)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingVideoIds => StatusCode::BAD_REQUEST,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MissingApiKey | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let details = match self {
            ProxyError::Upstream(err) => Some(err.details()),
            _ => None,
        };
        ErrorEnvelope {
            error: self.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn local_errors_have_no_details() {
        let body = serde_json::to_value(ProxyError::MissingApiKey.envelope()).unwrap();
        assert_eq!(body, json!({ "error": "YouTube API key is not configured" }));
        assert_eq!(
            ProxyError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::MissingVideoIds.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_errors_carry_payload_details() {
        let err = ProxyError::from(UpstreamError::Status {
            status: 400,
            body: Some(json!({ "error": { "code": 400 } })),
        });

        let body = serde_json::to_value(err.envelope()).unwrap();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Failed to fetch video data", "details": { "error": { "code": 400 } } })
        );
    }

    #[test]
    fn upstream_status_without_body_falls_back_to_message() {
        let err = ProxyError::from(UpstreamError::Status {
            status: 502,
            body: None,
        });

        assert_eq!(
            err.envelope().details,
            Some(json!("YouTube API responded with status 502"))
        );
    }
}
