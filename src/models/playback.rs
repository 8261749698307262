//! The receiver's current playback record.

use serde::{Deserialize, Serialize};

use super::cast::CastRequest;

/// What the receiver was last told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Stopped,
}

/// Snapshot served by `GET /status`. Stream fields are only present while playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl PlaybackState {
    pub fn idle() -> Self {
        Self::bare(PlaybackStatus::Idle)
    }

    pub fn stopped() -> Self {
        Self::bare(PlaybackStatus::Stopped)
    }

    pub fn playing(request: &CastRequest) -> Self {
        Self {
            status: PlaybackStatus::Playing,
            stream_url: Some(request.stream_url.clone()),
            title: Some(request.title.clone()),
            subtitle: Some(request.subtitle.clone()),
        }
    }

    fn bare(status: PlaybackStatus) -> Self {
        Self {
            status,
            stream_url: None,
            title: None,
            subtitle: None,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::idle()
    }
}
