//! HTTP handlers: cast, stop, status, and routing fallbacks.

use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};

use crate::error::AppError;
use crate::models::{ApiResponse, CastRequest, PlaybackState};
use crate::services::{Command, CommandRouter, SignalBus, StateStore};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub router: CommandRouter,
}

impl AppState {
    pub fn new(store: StateStore, signals: SignalBus) -> Self {
        Self {
            router: CommandRouter::new(store, signals),
        }
    }
}

/// POST /cast — start playback of the given stream.
/// The body is decoded by hand, and a body that cannot be buffered (e.g. over
/// the size limit) is reported like any other malformed body.
pub async fn cast(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    let body = body.map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;
    let request = CastRequest::from_json(&body)?;
    state.router.dispatch(Command::Cast(request)).await?;
    Ok(Json(ApiResponse::ok("Playback started")))
}

/// POST /stop — stop whatever is playing. No body required.
pub async fn stop(State(state): State<AppState>) -> Result<Json<ApiResponse>, AppError> {
    state.router.dispatch(Command::Stop).await?;
    Ok(Json(ApiResponse::ok("Playback stopped")))
}

/// GET /status — current playback record. Accepts any method.
pub async fn status(State(state): State<AppState>) -> Json<PlaybackState> {
    Json(state.router.status().await)
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
