//! Sender-facing request and response payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Body of `POST /cast`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CastRequest {
    #[validate(length(min = 1, message = "streamUrl must not be empty"))]
    pub stream_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
}

impl CastRequest {
    pub fn new(
        stream_url: impl Into<String>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self {
            stream_url: stream_url.into(),
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Decode a raw request body straight into a validated request.
    pub fn from_json(body: &[u8]) -> AppResult<Self> {
        let request: CastRequest =
            serde_json::from_slice(body).map_err(|e| AppError::MalformedBody(e.to_string()))?;
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(request)
    }
}

/// Outcome envelope returned for every command and error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
