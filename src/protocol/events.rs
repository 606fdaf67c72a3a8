//! Typed events exchanged with the backend.
//!
//! Payload shape depends on the event name, so both directions are tagged
//! unions keyed by name: `{"event": "<name>", "data": <payload>}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// `{message}` payload used by the lobby chat in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    /// Message text.
    pub message: String,
}

/// `{position, player}` payload of an inbound `move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    /// Element id of the cell that was played.
    pub position: String,
    /// Mark to show in the cell.
    pub player: String,
}

/// `{position}` payload of an outbound `move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Element id of the clicked cell.
    pub position: String,
}

/// Payload of `move_made`.
///
/// Only `player` is required; the backend also reports the board
/// coordinates and whose turn is next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveMadePayload {
    /// Mark of the player who moved.
    pub player: String,
    /// Board row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<usize>,
    /// Board column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<usize>,
    /// Mark of the player to move next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_player: Option<String>,
}

/// `{winner}` payload of `game_won`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinPayload {
    /// Mark of the winning player.
    pub winner: String,
}

/// Event delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Broadcast chat line (bare string).
    Message(String),
    /// A cell was played.
    Move(MovePayload),
    /// Broadcast lobby chat line.
    ReceiveMessage(ChatPayload),
    /// The backend accepted a move.
    MoveMade(MoveMadePayload),
    /// A player completed a line.
    GameWon(WinPayload),
    /// The backend cleared its board.
    ResetBoard,
}

impl InboundEvent {
    /// Returns the event's kind, the key handlers subscribe to.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Message(_) => EventKind::Message,
            Self::Move(_) => EventKind::Move,
            Self::ReceiveMessage(_) => EventKind::ReceiveMessage,
            Self::MoveMade(_) => EventKind::MoveMade,
            Self::GameWon(_) => EventKind::GameWon,
            Self::ResetBoard => EventKind::ResetBoard,
        }
    }
}

/// Names of the inbound events, used as subscription keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// `message`
    Message,
    /// `move`
    Move,
    /// `receive_message`
    ReceiveMessage,
    /// `move_made`
    MoveMade,
    /// `game_won`
    GameWon,
    /// `reset_board`
    ResetBoard,
}

impl EventKind {
    /// Every inbound kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Message,
        Self::Move,
        Self::ReceiveMessage,
        Self::MoveMade,
        Self::GameWon,
        Self::ResetBoard,
    ];

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Move => "move",
            Self::ReceiveMessage => "receive_message",
            Self::MoveMade => "move_made",
            Self::GameWon => "game_won",
            Self::ResetBoard => "reset_board",
        }
    }

    /// Looks up a kind by wire name.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownEvent`] for names outside the inbound
    /// event surface.
    pub fn from_name(name: &str) -> Result<Self, BridgeError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| BridgeError::UnknownEvent(name.to_string()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Chat line (bare string).
    Message(String),
    /// Request to play a cell.
    Move(MoveRequest),
    /// Lobby chat line.
    SendMessage(ChatPayload),
}

impl OutboundEvent {
    /// Builds a `message` emission.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// Builds a `move` emission for the given cell id.
    #[must_use]
    pub fn play(position: impl Into<String>) -> Self {
        Self::Move(MoveRequest {
            position: position.into(),
        })
    }

    /// Builds a `send_message` emission.
    #[must_use]
    pub fn send_message(message: impl Into<String>) -> Self {
        Self::SendMessage(ChatPayload {
            message: message.into(),
        })
    }

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Move(_) => "move",
            Self::SendMessage(_) => "send_message",
        }
    }
}
