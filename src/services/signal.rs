//! One-way Launch/Cancel signals from the control service to the playback surface.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::CastRequest;

const SIGNAL_CAPACITY: usize = 16;

/// Instruction for whichever playback surface is currently listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceSignal {
    /// Start rendering this stream with the given overlay text.
    Launch(CastRequest),
    /// Tear down any active rendering. Not tied to a session.
    Cancel,
}

/// Fan-out of surface signals. Emission is fire-and-forget: nothing waits for
/// a surface to acknowledge, and a signal with no listener is dropped.
#[derive(Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<SurfaceSignal>,
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(SIGNAL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SurfaceSignal> {
        self.tx.subscribe()
    }

    pub fn emit(&self, signal: SurfaceSignal) {
        match self.tx.send(signal) {
            Ok(listeners) => debug!(listeners, "surface signal sent"),
            Err(broadcast::error::SendError(signal)) => {
                debug!(?signal, "no playback surface listening; signal dropped")
            }
        }
    }

    pub fn launch(&self, request: CastRequest) {
        self.emit(SurfaceSignal::Launch(request));
    }

    pub fn cancel(&self) {
        self.emit(SurfaceSignal::Cancel);
    }

    /// Run `handler` for every `Cancel` until the bus is dropped.
    pub fn on_cancel<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: Fn() + Send + 'static,
    {
        self.listen(move |signal| {
            if signal == SurfaceSignal::Cancel {
                handler();
            }
        })
    }

    /// Run `handler` for every `Launch` until the bus is dropped.
    pub fn on_launch<F>(&self, handler: F) -> JoinHandle<()>
    where
        F: Fn(CastRequest) + Send + 'static,
    {
        self.listen(move |signal| {
            if let SurfaceSignal::Launch(request) = signal {
                handler(request);
            }
        })
    }

    fn listen<F>(&self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(SurfaceSignal) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(signal) => handler(signal),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "playback surface fell behind; signals skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
