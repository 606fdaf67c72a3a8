//! Bridge error types with stable numeric codes.
//!
//! [`BridgeError`] is the central error type of the crate. Handlers return
//! it when they fault, the codec returns it for frames it cannot read, and
//! the transport returns it when the socket fails.

/// Errors produced by the bridge, its codec, and its transport.
///
/// # Error Code Ranges
///
/// | Range     | Category            |
/// |-----------|---------------------|
/// | 1000–1999 | Protocol / input    |
/// | 2000–2999 | Not found           |
/// | 3000–3999 | Transport / internal|
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A handler looked up an element that is not in the document.
    #[error("element not found: #{0}")]
    MissingElement(String),

    /// Inbound event name is not part of the event surface.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Payload or frame JSON could not be serialized or deserialized.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Socket.IO text packet could not be understood.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    /// WebSocket connect, send, or receive failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// An internal channel was closed by its peer.
    #[error("channel closed")]
    ChannelClosed,

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BridgeError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Codec(_) => 1001,
            Self::UnknownEvent(_) => 1002,
            Self::MalformedPacket(_) => 1003,
            Self::Config(_) => 1004,
            Self::MissingElement(_) => 2001,
            Self::Transport(_) => 3001,
            Self::ChannelClosed => 3002,
        }
    }

    /// Returns `true` if the error came from the socket or an internal
    /// channel, which ends the run loop.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ChannelClosed)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for BridgeError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_ranges() {
        assert_eq!(BridgeError::MissingElement("x".into()).error_code(), 2001);
        assert_eq!(BridgeError::UnknownEvent("x".into()).error_code(), 1002);
        assert_eq!(BridgeError::ChannelClosed.error_code(), 3002);
    }

    #[test]
    fn only_transport_errors_are_fatal() {
        assert!(BridgeError::Transport("reset".into()).is_fatal());
        assert!(BridgeError::ChannelClosed.is_fatal());
        assert!(!BridgeError::MissingElement("chat-messages".into()).is_fatal());
        assert!(!BridgeError::MalformedPacket("9".into()).is_fatal());
    }

    #[test]
    fn missing_element_message_names_the_id() {
        let err = BridgeError::MissingElement("chat-messages".into());
        assert_eq!(err.to_string(), "element not found: #chat-messages");
    }
}
