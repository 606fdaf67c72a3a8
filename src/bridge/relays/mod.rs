//! Relay instances: the same bind-and-forward pattern, one per page widget.
//!
//! | Relay          | Emits          | Listens to                                         |
//! |----------------|----------------|----------------------------------------------------|
//! | [`ChatRelay`]  | `message`      | `message`                                          |
//! | [`BoardRelay`] | `move`         | `move`                                             |
//! | [`LobbyRelay`] | `send_message` | `receive_message`, `move_made`, `game_won`, `reset_board` |

pub mod board;
pub mod chat;
pub mod lobby;

pub use board::BoardRelay;
pub use chat::ChatRelay;
pub use lobby::LobbyRelay;

use super::{Dispatcher, DomListeners};
use crate::dom::{Document, NodeId, Tag};
use crate::error::BridgeError;

/// A set of bindings between page elements and socket events.
pub trait Relay {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Registers the relay's UI listeners and inbound handlers.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MissingElement`] if an element the relay
    /// attaches a listener to is not in `doc`.
    fn install(
        &self,
        doc: &Document,
        dispatcher: &mut Dispatcher,
        listeners: &mut DomListeners,
    ) -> Result<(), BridgeError>;
}

/// Looks up an element a listener must be attached to.
fn require(doc: &Document, id: &str) -> Result<NodeId, BridgeError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| BridgeError::MissingElement(id.to_string()))
}

/// Appends `<li>text</li>` to `list`.
fn append_item(doc: &mut Document, list: NodeId, text: &str) {
    let item = doc.create_element(Tag::Li);
    doc.set_text_content(item, text);
    doc.append_child(list, item);
}
