//! Core logic: playback state store, command routing, and surface signaling.

pub mod command;
pub mod signal;
pub mod state;

pub use command::{transition, Command, CommandRouter, Transition};
pub use signal::{SignalBus, SurfaceSignal};
pub use state::StateStore;
