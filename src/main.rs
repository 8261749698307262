//! Entry point: load config, wire the store and signal bus, and run the receiver.

use cast_receiver::config::Config;
use cast_receiver::net;
use cast_receiver::{AppState, CastServer, SignalBus, StateStore, SurfaceSignal};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let signals = SignalBus::new();
    let state = AppState::new(StateStore::new(), signals.clone());

    // Rendering lives outside this process; log what a surface would be told.
    let surface = tokio::spawn(log_surface(signals.subscribe()));

    // A bind failure must stop the whole receiver.
    let server = CastServer::start(config.port, state).await?;
    let port = server.local_addr().port();
    let lan_ip = net::lan_ipv4();
    info!("{}", net::listening_banner(lan_ip, port));
    if let Some(ip) = lan_ip {
        info!(endpoint = %net::cast_endpoint(ip, port), "ready to receive streams");
    }

    server
        .serve_until(async {
            shutdown_signal().await;
            signals.cancel();
        })
        .await?;

    surface.abort();
    Ok(())
}

async fn log_surface(mut rx: broadcast::Receiver<SurfaceSignal>) {
    loop {
        match rx.recv().await {
            Ok(SurfaceSignal::Launch(req)) => info!(
                stream_url = %req.stream_url,
                title = %req.title,
                subtitle = %req.subtitle,
                "launch playback surface"
            ),
            Ok(SurfaceSignal::Cancel) => info!("cancel playback surface"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "surface signals skipped")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let term = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = term => {},
    }

    info!("shutdown requested; cancelling playback");
}
