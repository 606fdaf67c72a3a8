//! Bridge configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::fmt;
use std::str::FromStr;

use crate::error::BridgeError;
use crate::protocol::WireFormat;

/// Which relays the front-end installs, and which page it builds for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Chat relay on the chat page.
    Chat,
    /// Tic-tac-toe relay on the board page.
    Board,
    /// Generic message/move/win/reset relay on the lobby page.
    Lobby,
    /// All three relays on one combined page.
    All,
}

impl FromStr for Profile {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chat" => Ok(Self::Chat),
            "board" => Ok(Self::Board),
            "lobby" => Ok(Self::Lobby),
            "all" => Ok(Self::All),
            other => Err(BridgeError::Config(format!("unknown profile: {other}"))),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chat => "chat",
            Self::Board => "board",
            Self::Lobby => "lobby",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// Log output format for the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level bridge configuration.
///
/// Loaded once at startup via [`BridgeConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Backend WebSocket URL (`ws://` or `wss://`).
    pub url: String,

    /// Framing used on the socket.
    pub wire_format: WireFormat,

    /// Relays to install.
    pub profile: Profile,

    /// Capacity of the bounded channels between the socket tasks and the
    /// bridge loop.
    pub channel_capacity: usize,

    /// Capacity of the mutation broadcast bus.
    pub update_bus_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

/// Default backend URL: a local Flask-SocketIO server.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket";

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            wire_format: WireFormat::SocketIo,
            profile: Profile::Chat,
            channel_capacity: 256,
            update_bus_capacity: 1024,
            log_format: LogFormat::Text,
        }
    }
}

impl BridgeConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] if `BRIDGE_URL` is not a `ws://` or
    /// `wss://` URL, or if `BRIDGE_WIRE_FORMAT` or `BRIDGE_PROFILE` name an
    /// unknown value.
    pub fn from_env() -> Result<Self, BridgeError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`BridgeConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let url = lookup("BRIDGE_URL").unwrap_or(defaults.url);
        validate_url(&url)?;

        let wire_format = match lookup("BRIDGE_WIRE_FORMAT") {
            Some(v) => v.parse()?,
            None => defaults.wire_format,
        };
        let profile = match lookup("BRIDGE_PROFILE") {
            Some(v) => v.parse()?,
            None => defaults.profile,
        };

        let channel_capacity = parse_or(
            lookup("BRIDGE_CHANNEL_CAPACITY"),
            defaults.channel_capacity,
        );
        let update_bus_capacity = parse_or(
            lookup("BRIDGE_UPDATE_BUS_CAPACITY"),
            defaults.update_bus_capacity,
        );

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            url,
            wire_format,
            profile,
            channel_capacity,
            update_bus_capacity,
            log_format,
        })
    }
}

fn validate_url(url: &str) -> Result<(), BridgeError> {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        Ok(())
    } else {
        Err(BridgeError::Config(format!(
            "BRIDGE_URL must start with ws:// or wss://, got {url}"
        )))
    }
}

/// Parses an optional value as a non-zero `usize`, returning `default` on
/// missing, invalid or zero values.
fn parse_or(value: Option<String>, default: usize) -> usize {
    value
        .and_then(|v| v.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let Ok(cfg) = BridgeConfig::from_lookup(|_| None) else {
            panic!("defaults must load");
        };
        assert_eq!(cfg.url, DEFAULT_URL);
        assert_eq!(cfg.wire_format, WireFormat::SocketIo);
        assert_eq!(cfg.profile, Profile::Chat);
        assert_eq!(cfg.channel_capacity, 256);
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn reads_all_variables() {
        let lookup = lookup_from(&[
            ("BRIDGE_URL", "ws://example.test:9000/ws"),
            ("BRIDGE_WIRE_FORMAT", "envelope"),
            ("BRIDGE_PROFILE", "all"),
            ("BRIDGE_CHANNEL_CAPACITY", "8"),
            ("BRIDGE_UPDATE_BUS_CAPACITY", "16"),
            ("LOG_FORMAT", "json"),
        ]);
        let Ok(cfg) = BridgeConfig::from_lookup(lookup) else {
            panic!("config must load");
        };
        assert_eq!(cfg.url, "ws://example.test:9000/ws");
        assert_eq!(cfg.wire_format, WireFormat::Envelope);
        assert_eq!(cfg.profile, Profile::All);
        assert_eq!(cfg.channel_capacity, 8);
        assert_eq!(cfg.update_bus_capacity, 16);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_http_url() {
        let lookup = lookup_from(&[("BRIDGE_URL", "http://example.test")]);
        assert!(matches!(
            BridgeConfig::from_lookup(lookup),
            Err(BridgeError::Config(_))
        ));
    }

    #[test]
    fn rejects_unknown_profile() {
        let lookup = lookup_from(&[("BRIDGE_PROFILE", "poker")]);
        assert!(matches!(
            BridgeConfig::from_lookup(lookup),
            Err(BridgeError::Config(_))
        ));
    }

    #[test]
    fn zero_or_garbage_capacity_falls_back() {
        let lookup = lookup_from(&[
            ("BRIDGE_CHANNEL_CAPACITY", "0"),
            ("BRIDGE_UPDATE_BUS_CAPACITY", "lots"),
        ]);
        let Ok(cfg) = BridgeConfig::from_lookup(lookup) else {
            panic!("config must load");
        };
        assert_eq!(cfg.channel_capacity, 256);
        assert_eq!(cfg.update_bus_capacity, 1024);
    }
}
