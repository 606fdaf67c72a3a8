//! Application wiring shared by the binary and the integration tests.

use crate::bridge::{BoardRelay, Bridge, ChatRelay, LobbyRelay};
use crate::config::{BridgeConfig, Profile};
use crate::dom::{Document, UpdateBus, page};
use crate::error::BridgeError;

/// Configuration plus the update bus renderers subscribe to.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: BridgeConfig,
    /// Bus carrying document updates to renderers.
    pub update_bus: UpdateBus,
}

impl AppState {
    /// Creates the state for `config`.
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        let update_bus = UpdateBus::new(config.update_bus_capacity);
        Self { config, update_bus }
    }

    /// Builds the page for the configured profile and installs its relays.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MissingElement`] if a relay cannot bind to
    /// the page, which only happens if the page layouts and the relays
    /// disagree.
    pub fn build_bridge(&self) -> Result<Bridge, BridgeError> {
        build_bridge(self.config.profile)
    }
}

/// Builds the page for `profile` and installs its relays.
///
/// # Errors
///
/// Same as [`AppState::build_bridge`].
pub fn build_bridge(profile: Profile) -> Result<Bridge, BridgeError> {
    let mut bridge = Bridge::new(page_for(profile));
    match profile {
        Profile::Chat => bridge.install(&ChatRelay)?,
        Profile::Board => bridge.install(&BoardRelay)?,
        Profile::Lobby => bridge.install(&LobbyRelay)?,
        Profile::All => {
            bridge.install(&ChatRelay)?;
            bridge.install(&BoardRelay)?;
            bridge.install(&LobbyRelay)?;
        }
    }
    Ok(bridge)
}

fn page_for(profile: Profile) -> Document {
    match profile {
        Profile::Chat => page::chat_page(),
        Profile::Board => page::board_page(),
        Profile::Lobby => page::lobby_page(),
        Profile::All => page::combined_page(),
    }
}
