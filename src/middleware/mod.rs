//! Middleware: CORS for untrusted LAN senders, and panic isolation.

pub mod cors;

pub use cors::{cors_headers, panic_response, preflight};
