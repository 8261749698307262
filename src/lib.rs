//! LAN cast receiver control service.
//!
//! Senders on the local network `POST /cast` a stream URL, `POST /stop` it, and
//! poll `GET /status`. The service keeps one playback record in memory and
//! emits Launch/Cancel signals for a separately running playback surface.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod net;
pub mod server;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::http::AppState;
pub use models::{ApiResponse, CastRequest, PlaybackState, PlaybackStatus};
pub use server::CastServer;
pub use services::{SignalBus, StateStore, SurfaceSignal};

use axum::routing::{any, post};
use handlers::http;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Build the control router. Used by `CastServer` and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let [allow_origin, allow_methods, allow_headers] = middleware::cors_headers();

    axum::Router::new()
        .route("/cast", post(http::cast).fallback(http::method_not_allowed))
        .route("/stop", post(http::stop).fallback(http::method_not_allowed))
        .route("/status", any(http::status))
        .fallback(http::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(axum::middleware::from_fn(middleware::preflight))
        .layer(allow_origin)
        .layer(allow_methods)
        .layer(allow_headers)
        .layer(TraceLayer::new_for_http())
}
