//! Chat relay: `#chat-form` submissions out, `message` lines in.

use super::{Relay, append_item, require};
use crate::bridge::{Dispatcher, DomEventKind, DomListeners};
use crate::dom::Document;
use crate::dom::page::{CHAT_FORM, CHAT_INPUT, CHAT_MESSAGES};
use crate::error::BridgeError;
use crate::protocol::{EventKind, InboundEvent, OutboundEvent};

/// Relays the chat widget.
///
/// - submit on `#chat-form`: emit `message` with the value of
///   `#chat-input`, then clear the field. Empty values are sent too.
/// - inbound `message`: append a list item to `#chat-messages` and scroll
///   the list to the bottom.
///
/// The input and the list are looked up once, at install time. A missing
/// list is not detected until a message arrives, at which point the
/// handler fails with [`BridgeError::MissingElement`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatRelay;

impl Relay for ChatRelay {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn install(
        &self,
        doc: &Document,
        dispatcher: &mut Dispatcher,
        listeners: &mut DomListeners,
    ) -> Result<(), BridgeError> {
        let form = require(doc, CHAT_FORM)?;
        let input = doc.get_element_by_id(CHAT_INPUT);
        let messages = doc.get_element_by_id(CHAT_MESSAGES);

        listeners.add(self.name(), form, DomEventKind::Submit, move |ctx| {
            let input = input.ok_or_else(|| BridgeError::MissingElement(CHAT_INPUT.into()))?;
            let message = ctx.doc.value(input).unwrap_or_default().to_string();
            ctx.outbox.emit(OutboundEvent::message(message));
            ctx.doc.set_value(input, "");
            Ok(())
        });

        dispatcher.on(self.name(), EventKind::Message, move |doc, event| {
            let InboundEvent::Message(text) = event else {
                return Ok(());
            };
            let list =
                messages.ok_or_else(|| BridgeError::MissingElement(CHAT_MESSAGES.into()))?;
            append_item(doc, list, text);
            let bottom = doc.scroll_height(list);
            doc.set_scroll_top(list, bottom);
            Ok(())
        });

        Ok(())
    }
}
