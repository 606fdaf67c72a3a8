//! The realtime UI bridge.
//!
//! [`Bridge`] owns the [`Document`] and the two subscription tables. UI
//! events go in through [`Bridge::handle_dom_event`] and leave as queued
//! [`OutboundEvent`]s; inbound events go in through
//! [`Bridge::handle_inbound`] and leave as document [`Mutation`]s. Every
//! call runs to completion before the next one can start, because every
//! entry point takes `&mut self`.

pub mod dispatch;
pub mod relays;

pub use dispatch::{
    DispatchReport, DomContext, DomEvent, DomEventKind, DomListeners, Dispatcher, Outbox,
};
pub use relays::{BoardRelay, ChatRelay, LobbyRelay, Relay};

use crate::dom::{Document, Mutation, NodeId};
use crate::error::BridgeError;
use crate::protocol::{EventKind, InboundEvent, OutboundEvent};

/// Single writer of the UI mirror.
#[derive(Debug)]
pub struct Bridge {
    document: Document,
    dispatcher: Dispatcher,
    listeners: DomListeners,
    outbox: Outbox,
    relays: Vec<&'static str>,
}

impl Bridge {
    /// Creates a bridge over `document` with nothing installed.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            dispatcher: Dispatcher::new(),
            listeners: DomListeners::new(),
            outbox: Outbox::default(),
            relays: Vec::new(),
        }
    }

    /// Installs a relay's bindings.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MissingElement`] if the page lacks an element
    /// the relay binds a listener to. Nothing is installed in that case.
    pub fn install<R: Relay>(&mut self, relay: &R) -> Result<(), BridgeError> {
        let mut dispatcher = Dispatcher::new();
        let mut listeners = DomListeners::new();
        relay.install(&self.document, &mut dispatcher, &mut listeners)?;
        self.dispatcher.merge(dispatcher);
        self.listeners.merge(listeners);
        self.relays.push(relay.name());
        tracing::info!(
            relay = relay.name(),
            listeners = self.listeners.len(),
            "relay installed"
        );
        Ok(())
    }

    /// Names of the installed relays, in installation order.
    #[must_use]
    pub fn relays(&self) -> &[&'static str] {
        &self.relays
    }

    /// Returns the number of inbound handlers registered for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.dispatcher.handler_count(kind)
    }

    /// Applies a UI event and runs the listeners along its bubbling path.
    ///
    /// `Input` events set the target's value before listeners run.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MissingElement`] if no connected element has
    /// the event's target id.
    pub fn handle_dom_event(&mut self, event: &DomEvent) -> Result<DispatchReport, BridgeError> {
        let target = self.resolve(event.target())?;
        if let DomEvent::Input { value, .. } = event {
            self.document.set_value(target, value.clone());
        }
        Ok(self
            .listeners
            .deliver(&mut self.document, &mut self.outbox, event, target))
    }

    /// Runs the inbound handlers subscribed to the event's kind.
    pub fn handle_inbound(&mut self, event: &InboundEvent) -> DispatchReport {
        self.dispatcher.dispatch(&mut self.document, event)
    }

    /// Removes and returns the queued emissions, oldest first.
    pub fn drain_outbound(&mut self) -> Vec<OutboundEvent> {
        self.outbox.drain()
    }

    /// Removes and returns the document mutations recorded so far.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        self.document.take_mutations()
    }

    /// Read access to the UI mirror.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    fn resolve(&self, id: &str) -> Result<NodeId, BridgeError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| BridgeError::MissingElement(id.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::dom::page;
    use crate::protocol::MovePayload;

    #[test]
    fn install_records_relays_and_handlers() {
        let mut bridge = Bridge::new(page::combined_page());
        assert!(bridge.install(&ChatRelay).is_ok());
        assert!(bridge.install(&BoardRelay).is_ok());
        assert!(bridge.install(&LobbyRelay).is_ok());

        assert_eq!(bridge.relays(), &["chat", "board", "lobby"]);
        assert_eq!(bridge.handler_count(EventKind::Message), 1);
        assert_eq!(bridge.handler_count(EventKind::Move), 1);
        assert_eq!(bridge.handler_count(EventKind::ReceiveMessage), 1);
        assert_eq!(bridge.handler_count(EventKind::ResetBoard), 1);
    }

    #[test]
    fn failed_install_leaves_no_bindings() {
        let mut bridge = Bridge::new(page::chat_page());
        assert!(matches!(
            bridge.install(&BoardRelay),
            Err(BridgeError::MissingElement(id)) if id == page::BOARD
        ));
        assert!(bridge.relays().is_empty());
        assert!(bridge.listeners.is_empty());
        assert_eq!(bridge.handler_count(EventKind::Move), 0);
    }

    #[test]
    fn dom_event_for_unknown_element_is_an_error() {
        let mut bridge = Bridge::new(page::chat_page());
        let event = DomEvent::Click {
            target: "nowhere".into(),
        };
        assert!(matches!(
            bridge.handle_dom_event(&event),
            Err(BridgeError::MissingElement(_))
        ));
    }

    #[test]
    fn input_event_sets_value() {
        let mut bridge = Bridge::new(page::chat_page());
        let event = DomEvent::Input {
            target: page::CHAT_INPUT.into(),
            value: "typed".into(),
        };
        assert!(bridge.handle_dom_event(&event).is_ok());
        let input = bridge.document().get_element_by_id(page::CHAT_INPUT);
        assert_eq!(input.and_then(|i| bridge.document().value(i)), Some("typed"));
    }

    #[test]
    fn events_apply_in_delivery_order() {
        let mut bridge = Bridge::new(page::board_page());
        assert!(bridge.install(&BoardRelay).is_ok());

        for player in ["X", "O"] {
            bridge.handle_inbound(&InboundEvent::Move(MovePayload {
                position: "cell-4".into(),
                player: player.into(),
            }));
        }

        let mutations = bridge.take_mutations();
        assert_eq!(mutations.len(), 2);
        let cell = bridge.document().get_element_by_id("cell-4");
        assert_eq!(cell.and_then(|c| bridge.document().text_content(c)), Some("O"));
    }
}
