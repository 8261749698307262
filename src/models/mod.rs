//! Data models for cast requests, playback state, and API responses.

pub mod cast;
pub mod playback;

pub use cast::*;
pub use playback::*;
