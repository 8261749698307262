//! Command routing: (current state, command) -> (next state, surface signal).

use tracing::info;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{CastRequest, PlaybackState};
use crate::services::signal::{SignalBus, SurfaceSignal};
use crate::services::state::StateStore;

/// State-changing instructions from a sender. Status is a query, not a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cast(CastRequest),
    Stop,
}

/// Result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: PlaybackState,
    pub signal: SurfaceSignal,
}

/// Pure transition function. The next state never depends on the current one:
/// a cast while playing supersedes it, a stop is valid from any state.
pub fn transition(_current: &PlaybackState, command: Command) -> AppResult<Transition> {
    match command {
        Command::Cast(request) => {
            request
                .validate()
                .map_err(|e| AppError::Validation(e.to_string()))?;
            Ok(Transition {
                state: PlaybackState::playing(&request),
                signal: SurfaceSignal::Launch(request),
            })
        }
        Command::Stop => Ok(Transition {
            state: PlaybackState::stopped(),
            signal: SurfaceSignal::Cancel,
        }),
    }
}

/// Applies commands to the store and emits the matching surface signal.
#[derive(Clone)]
pub struct CommandRouter {
    store: StateStore,
    signals: SignalBus,
}

impl CommandRouter {
    pub fn new(store: StateStore, signals: SignalBus) -> Self {
        Self { store, signals }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn signals(&self) -> &SignalBus {
        &self.signals
    }

    /// Apply `command`. The signal is emitted under the store's write lock so
    /// surfaces observe signals in the same order as state transitions.
    pub async fn dispatch(&self, command: Command) -> AppResult<PlaybackState> {
        let signals = &self.signals;
        self.store
            .update(|current| {
                let Transition { state, signal } = transition(current, command)?;
                match &signal {
                    SurfaceSignal::Launch(req) => {
                        info!(stream_url = %req.stream_url, title = %req.title, "starting playback")
                    }
                    SurfaceSignal::Cancel => info!("playback stopped"),
                }
                signals.emit(signal);
                Ok((state.clone(), state))
            })
            .await
    }

    pub async fn status(&self) -> PlaybackState {
        self.store.snapshot().await
    }
}
