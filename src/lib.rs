//! # realtime-bridge
//!
//! Realtime UI bridge for chat and board-game pages.
//!
//! The bridge wires UI input events to outbound socket emissions, and
//! inbound socket events to UI mutations. The page is an explicit
//! [`dom::Document`] owned by the bridge; inbound payloads are a tagged
//! union ([`protocol::InboundEvent`]); handlers are registered per event
//! name and run one event at a time, to completion, in registration order.
//!
//! ## Architecture
//!
//! ```text
//! Front-end (stdin lines)        Backend (WebSocket / Socket.IO)
//!     │                                   │
//!     │ DomEvent                          │ text frames
//!     │                                   ├── reader task ── codec::decode
//!     └──────────► session::run ◄─────────┘
//!                      │   ▲                 writer task ◄── codec::encode
//!                      ▼   │
//!                   Bridge (relays: chat, board, lobby)
//!                      │
//!                   Document ── Mutation ──► UpdateBus ──► renderers
//! ```

pub mod app_state;
pub mod bridge;
pub mod config;
pub mod dom;
pub mod error;
pub mod frontend;
pub mod protocol;
pub mod transport;
