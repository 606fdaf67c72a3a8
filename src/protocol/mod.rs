//! Wire protocol: typed events and the text-frame codec.
//!
//! The event surface is fixed: three outbound events (`message`, `move`,
//! `send_message`) and six inbound ones (`message`, `move`,
//! `receive_message`, `move_made`, `game_won`, `reset_board`).

pub mod codec;
pub mod events;

pub use codec::{Frame, WireFormat};
pub use events::{
    ChatPayload, EventKind, InboundEvent, MoveMadePayload, MovePayload, MoveRequest,
    OutboundEvent, WinPayload,
};
