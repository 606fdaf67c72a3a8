//! Transport layer: the socket client and the bridge's event loop.
//!
//! The backend is reached through a single WebSocket opened at startup.
//! There is no reconnection: when the socket closes, the loop stops.

pub mod client;
pub mod session;

pub use client::{Connection, connect};
pub use session::{StopReason, run};
