//! Text-frame codec for the two supported wire formats.
//!
//! - [`WireFormat::Envelope`]: one JSON object per frame,
//!   `{"event": "<name>", "data": <payload>}`.
//! - [`WireFormat::SocketIo`]: Engine.IO v4 / Socket.IO v5 text packets,
//!   e.g. `42["move",{"position":"cell-1","player":"O"}]`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::{EventKind, InboundEvent, OutboundEvent};
use crate::error::BridgeError;

/// Packet the client sends to join the default Socket.IO namespace.
pub const CONNECT_PACKET: &str = "40";

/// Packet the client sends in answer to an Engine.IO ping.
pub const PONG_PACKET: &str = "3";

/// Framing used on the WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// Plain JSON envelope per frame.
    Envelope,
    /// Socket.IO over Engine.IO text packets.
    SocketIo,
}

impl FromStr for WireFormat {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "envelope" | "json" => Ok(Self::Envelope),
            "socketio" | "socket.io" => Ok(Self::SocketIo),
            other => Err(BridgeError::Config(format!("unknown wire format: {other}"))),
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope => f.write_str("envelope"),
            Self::SocketIo => f.write_str("socketio"),
        }
    }
}

/// A decoded text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Application event for the bridge.
    Event(InboundEvent),
    /// Engine.IO handshake; the client must join the namespace.
    Open,
    /// Engine.IO ping; the client must answer with a pong.
    Ping,
    /// Socket.IO namespace joined.
    Connected,
    /// Server closed the session or left the namespace.
    Disconnect,
    /// Anything the bridge has no use for (pongs, noops, acks).
    Ignored,
}

impl Frame {
    /// Returns the packet the client must send in reply, if any.
    #[must_use]
    pub const fn reply(&self) -> Option<&'static str> {
        match self {
            Self::Open => Some(CONNECT_PACKET),
            Self::Ping => Some(PONG_PACKET),
            _ => None,
        }
    }
}

/// Encodes an outbound event as a text frame.
///
/// # Errors
///
/// Returns [`BridgeError::Codec`] if the payload cannot be serialized.
pub fn encode(event: &OutboundEvent, format: WireFormat) -> Result<String, BridgeError> {
    match format {
        WireFormat::Envelope => Ok(serde_json::to_string(event)?),
        WireFormat::SocketIo => {
            let mut value = serde_json::to_value(event)?;
            let data = value.get_mut("data").map(Value::take);
            let mut args = vec![Value::String(event.name().to_string())];
            args.extend(data);
            Ok(format!("42{}", serde_json::to_string(&args)?))
        }
    }
}

/// Decodes one text frame.
///
/// # Errors
///
/// - [`BridgeError::Codec`] for invalid JSON or a payload of the wrong shape.
/// - [`BridgeError::UnknownEvent`] for event names outside the inbound surface.
/// - [`BridgeError::MalformedPacket`] for Socket.IO packets that cannot be read.
/// - [`BridgeError::Transport`] when the server refuses the namespace.
pub fn decode(text: &str, format: WireFormat) -> Result<Frame, BridgeError> {
    match format {
        WireFormat::Envelope => decode_envelope(text).map(Frame::Event),
        WireFormat::SocketIo => decode_socketio(text),
    }
}

/// Builds an inbound event from its wire name and optional payload.
///
/// # Errors
///
/// Returns [`BridgeError::UnknownEvent`] for unknown names and
/// [`BridgeError::Codec`] when the payload does not fit the event.
pub fn decode_event(name: &str, data: Option<Value>) -> Result<InboundEvent, BridgeError> {
    let kind = EventKind::from_name(name)?;
    let mut envelope = serde_json::Map::new();
    envelope.insert("event".into(), Value::String(kind.name().to_string()));
    if let Some(data) = data.filter(|d| !(kind == EventKind::ResetBoard && d.is_null())) {
        envelope.insert("data".into(), data);
    }
    Ok(serde_json::from_value(Value::Object(envelope))?)
}

fn decode_envelope(text: &str) -> Result<InboundEvent, BridgeError> {
    let mut value: Value = serde_json::from_str(text)?;
    let name = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::MalformedPacket("envelope without event name".into()))?
        .to_string();
    let data = value.get_mut("data").map(Value::take);
    decode_event(&name, data)
}

fn decode_socketio(text: &str) -> Result<Frame, BridgeError> {
    let mut chars = text.chars();
    match chars.next() {
        Some('0') => Ok(Frame::Open),
        Some('1') => Ok(Frame::Disconnect),
        Some('2') => Ok(Frame::Ping),
        Some('3' | '5' | '6') => Ok(Frame::Ignored),
        Some('4') => decode_socketio_packet(chars.as_str()),
        _ => Err(BridgeError::MalformedPacket(text.to_string())),
    }
}

fn decode_socketio_packet(packet: &str) -> Result<Frame, BridgeError> {
    let mut chars = packet.chars();
    let packet_type = chars.next();
    let body = skip_namespace(chars.as_str());
    match packet_type {
        Some('0') => Ok(Frame::Connected),
        Some('1') => Ok(Frame::Disconnect),
        Some('2') => {
            let args = body.trim_start_matches(|c: char| c.is_ascii_digit());
            let Value::Array(args) = serde_json::from_str::<Value>(args)? else {
                return Err(BridgeError::MalformedPacket(format!("4{packet}")));
            };
            let mut args = args.into_iter();
            let Some(Value::String(name)) = args.next() else {
                return Err(BridgeError::MalformedPacket(format!("4{packet}")));
            };
            decode_event(&name, args.next()).map(Frame::Event)
        }
        Some('3') => Ok(Frame::Ignored),
        Some('4') => Err(BridgeError::Transport(format!(
            "namespace connection refused: {body}"
        ))),
        _ => Err(BridgeError::MalformedPacket(format!("4{packet}"))),
    }
}

/// Strips a leading `/namespace,` from a Socket.IO packet body.
fn skip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        body.split_once(',').map_or("", |(_, rest)| rest)
    } else {
        body
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::protocol::{ChatPayload, MovePayload, WinPayload};

    fn event(text: &str, format: WireFormat) -> InboundEvent {
        match decode(text, format) {
            Ok(Frame::Event(event)) => event,
            other => panic!("expected event from {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn socketio_event_packets_decode() {
        assert_eq!(
            event(
                r#"42["move",{"position":"cell-1","player":"O"}]"#,
                WireFormat::SocketIo
            ),
            InboundEvent::Move(MovePayload {
                position: "cell-1".into(),
                player: "O".into(),
            })
        );
        assert_eq!(
            event(r#"42["message","hi"]"#, WireFormat::SocketIo),
            InboundEvent::Message("hi".into())
        );
        assert_eq!(
            event(r#"42["reset_board"]"#, WireFormat::SocketIo),
            InboundEvent::ResetBoard
        );
        assert_eq!(
            event(r#"42["game_won",{"winner":"X"}]"#, WireFormat::SocketIo),
            InboundEvent::GameWon(WinPayload { winner: "X".into() })
        );
    }

    #[test]
    fn socketio_namespace_and_ack_id_are_skipped() {
        assert_eq!(
            event(
                r#"42/game,17["receive_message",{"message":"gg"}]"#,
                WireFormat::SocketIo
            ),
            InboundEvent::ReceiveMessage(ChatPayload {
                message: "gg".into()
            })
        );
    }

    #[test]
    fn socketio_control_packets() {
        let open = decode(r#"0{"sid":"abc","pingInterval":25000}"#, WireFormat::SocketIo);
        assert!(matches!(open, Ok(Frame::Open)));
        assert_eq!(Frame::Open.reply(), Some(CONNECT_PACKET));

        assert!(matches!(decode("2", WireFormat::SocketIo), Ok(Frame::Ping)));
        assert_eq!(Frame::Ping.reply(), Some(PONG_PACKET));

        assert!(matches!(
            decode(r#"40{"sid":"x"}"#, WireFormat::SocketIo),
            Ok(Frame::Connected)
        ));
        assert!(matches!(decode("41", WireFormat::SocketIo), Ok(Frame::Disconnect)));
        assert!(matches!(decode("6", WireFormat::SocketIo), Ok(Frame::Ignored)));
        assert_eq!(Frame::Connected.reply(), None);
    }

    #[test]
    fn socketio_rejects_garbage() {
        assert!(matches!(
            decode("", WireFormat::SocketIo),
            Err(BridgeError::MalformedPacket(_))
        ));
        assert!(matches!(
            decode("9", WireFormat::SocketIo),
            Err(BridgeError::MalformedPacket(_))
        ));
        assert!(matches!(
            decode(r#"42{"not":"an array"}"#, WireFormat::SocketIo),
            Err(BridgeError::MalformedPacket(_))
        ));
        assert!(matches!(
            decode(r#"42["make_move",{"x":0}]"#, WireFormat::SocketIo),
            Err(BridgeError::UnknownEvent(_))
        ));
        assert!(matches!(
            decode(r#"44{"message":"nope"}"#, WireFormat::SocketIo),
            Err(BridgeError::Transport(_))
        ));
    }

    #[test]
    fn wrong_payload_shape_is_a_codec_error() {
        assert!(matches!(
            decode(r#"42["move","cell-1"]"#, WireFormat::SocketIo),
            Err(BridgeError::Codec(_))
        ));
        assert!(matches!(
            decode(r#"{"event":"message","data":42}"#, WireFormat::Envelope),
            Err(BridgeError::Codec(_))
        ));
    }

    #[test]
    fn envelope_frames_decode() {
        assert_eq!(
            event(
                r#"{"event":"receive_message","data":{"message":"hello"}}"#,
                WireFormat::Envelope
            ),
            InboundEvent::ReceiveMessage(ChatPayload {
                message: "hello".into()
            })
        );
        assert_eq!(
            event(r#"{"event":"reset_board","data":null}"#, WireFormat::Envelope),
            InboundEvent::ResetBoard
        );
        assert!(matches!(
            decode(r#"{"data":"orphan"}"#, WireFormat::Envelope),
            Err(BridgeError::MalformedPacket(_))
        ));
    }

    #[test]
    fn encodes_both_formats() {
        let msg = OutboundEvent::message("hi");
        assert!(matches!(
            encode(&msg, WireFormat::SocketIo).as_deref(),
            Ok(r#"42["message","hi"]"#)
        ));
        assert!(matches!(
            encode(&msg, WireFormat::Envelope).as_deref(),
            Ok(r#"{"event":"message","data":"hi"}"#)
        ));

        let mv = OutboundEvent::play("cell-3");
        assert!(matches!(
            encode(&mv, WireFormat::SocketIo).as_deref(),
            Ok(r#"42["move",{"position":"cell-3"}]"#)
        ));
    }

    #[test]
    fn wire_format_parses_from_config_strings() {
        assert!(matches!("socketio".parse::<WireFormat>(), Ok(WireFormat::SocketIo)));
        assert!(matches!("Envelope".parse::<WireFormat>(), Ok(WireFormat::Envelope)));
        assert!(matches!(
            "xml".parse::<WireFormat>(),
            Err(BridgeError::Config(_))
        ));
    }
}
