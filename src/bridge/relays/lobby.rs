//! Lobby relay: the page that pairs a chat box with game notifications.
//!
//! Out: Enter in `#messageInput` sends `send_message`. In:
//! `receive_message` lines go to `#messages`; `move_made`, `game_won` and
//! `reset_board` are reported in the log.

use super::{Relay, append_item, require};
use crate::bridge::{Dispatcher, DomEventKind, DomListeners};
use crate::dom::Document;
use crate::dom::page::{self, LOBBY_INPUT, LOBBY_MESSAGES};
use crate::error::BridgeError;
use crate::protocol::{EventKind, InboundEvent, OutboundEvent};

/// Key that sends the lobby message.
pub const SEND_KEY: &str = "Enter";

/// Relays the lobby widget.
///
/// Unlike [`super::ChatRelay`], elements are looked up again on every
/// event, so a list added after install is still found.
#[derive(Debug, Clone, Copy, Default)]
pub struct LobbyRelay;

impl Relay for LobbyRelay {
    fn name(&self) -> &'static str {
        "lobby"
    }

    fn install(
        &self,
        doc: &Document,
        dispatcher: &mut Dispatcher,
        listeners: &mut DomListeners,
    ) -> Result<(), BridgeError> {
        let input = require(doc, LOBBY_INPUT)?;

        listeners.add(self.name(), input, DomEventKind::KeyDown, |ctx| {
            if ctx.event.key() != Some(SEND_KEY) {
                return Ok(());
            }
            let input = require(ctx.doc, LOBBY_INPUT)?;
            let message = ctx.doc.value(input).unwrap_or_default().to_string();
            ctx.doc.set_value(input, "");
            ctx.outbox.emit(OutboundEvent::send_message(message));
            Ok(())
        });

        dispatcher.on(self.name(), EventKind::ReceiveMessage, |doc, event| {
            let InboundEvent::ReceiveMessage(payload) = event else {
                return Ok(());
            };
            let list = require(doc, LOBBY_MESSAGES)?;
            append_item(doc, list, &payload.message);
            let bottom = doc.scroll_height(doc.body());
            doc.scroll_window_to(bottom);
            Ok(())
        });

        dispatcher.on(self.name(), EventKind::MoveMade, |doc, event| {
            let InboundEvent::MoveMade(mv) = event else {
                return Ok(());
            };
            tracing::info!(
                player = %mv.player,
                x = ?mv.x,
                y = ?mv.y,
                next_player = ?mv.next_player,
                "move made"
            );
            let cell = mv
                .x
                .zip(mv.y)
                .and_then(|(row, col)| page::cell_id(row, col))
                .and_then(|id| doc.get_element_by_id(&id));
            if let Some(cell) = cell {
                doc.set_text_content(cell, mv.player.as_str());
            }
            Ok(())
        });

        dispatcher.on(self.name(), EventKind::GameWon, |_, event| {
            if let InboundEvent::GameWon(win) = event {
                tracing::info!(winner = %win.winner, "game won");
            }
            Ok(())
        });

        dispatcher.on(self.name(), EventKind::ResetBoard, |_, _| {
            tracing::info!("board reset");
            Ok(())
        });

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::bridge::{Bridge, DomEvent};
    use crate::dom::{Mutation, Tag};
    use crate::protocol::{ChatPayload, MoveMadePayload, WinPayload};

    fn lobby_bridge(doc: Document) -> Bridge {
        let mut bridge = Bridge::new(doc);
        if let Err(err) = bridge.install(&LobbyRelay) {
            panic!("install failed: {err}");
        }
        bridge
    }

    fn type_and_press(bridge: &mut Bridge, text: &str, key: &str) {
        let typed = DomEvent::Input {
            target: LOBBY_INPUT.into(),
            value: text.into(),
        };
        let pressed = DomEvent::KeyDown {
            target: LOBBY_INPUT.into(),
            key: key.into(),
        };
        assert!(bridge.handle_dom_event(&typed).is_ok());
        assert!(bridge.handle_dom_event(&pressed).is_ok());
    }

    fn input_value(bridge: &Bridge) -> Option<&str> {
        let doc = bridge.document();
        doc.get_element_by_id(LOBBY_INPUT).and_then(|i| doc.value(i))
    }

    #[test]
    fn enter_sends_and_clears() {
        let mut bridge = lobby_bridge(page::lobby_page());
        type_and_press(&mut bridge, "gg", "Enter");
        assert_eq!(
            bridge.drain_outbound(),
            vec![OutboundEvent::send_message("gg")]
        );
        assert_eq!(input_value(&bridge), Some(""));
    }

    #[test]
    fn other_keys_do_nothing() {
        let mut bridge = lobby_bridge(page::lobby_page());
        type_and_press(&mut bridge, "g", "g");
        assert!(bridge.drain_outbound().is_empty());
        assert_eq!(input_value(&bridge), Some("g"));
    }

    #[test]
    fn receive_message_appends_to_messages_and_scrolls_window() {
        let mut bridge = lobby_bridge(page::lobby_page());
        bridge.take_mutations();
        let report = bridge.handle_inbound(&InboundEvent::ReceiveMessage(ChatPayload {
            message: "hello".into(),
        }));
        assert_eq!(report.handled, 1);

        let doc = bridge.document();
        let Some(list) = doc.get_element_by_id(LOBBY_MESSAGES) else {
            panic!("messages list missing");
        };
        assert_eq!(doc.child_texts(list), vec!["hello"]);
        assert_eq!(doc.window_scroll_y(), doc.scroll_height(doc.body()));

        let mutations = bridge.take_mutations();
        assert_eq!(
            mutations,
            vec![
                Mutation::ChildAppended {
                    parent: "#messages".into(),
                    tag: Tag::Li,
                    text: "hello".into(),
                },
                Mutation::WindowScrolled { scroll_y: 3 },
            ]
        );
    }

    #[test]
    fn receive_message_without_list_fails() {
        let mut doc = Document::new();
        let body = doc.body();
        let input = doc.create_element_with_id(Tag::Input, LOBBY_INPUT);
        doc.append_child(body, input);

        let mut bridge = lobby_bridge(doc);
        let report = bridge.handle_inbound(&InboundEvent::ReceiveMessage(ChatPayload {
            message: "lost".into(),
        }));
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn move_made_marks_cell_when_coordinates_are_known() {
        let mut doc = page::lobby_page();
        page::mount_board(&mut doc);
        let mut bridge = lobby_bridge(doc);

        bridge.handle_inbound(&InboundEvent::MoveMade(MoveMadePayload {
            player: "O".into(),
            x: Some(1),
            y: Some(2),
            next_player: Some("X".into()),
        }));
        let doc = bridge.document();
        let cell = doc.get_element_by_id("cell-5");
        assert_eq!(cell.and_then(|c| doc.text_content(c)), Some("O"));
    }

    #[test]
    fn notifications_without_coordinates_leave_the_page_alone() {
        let mut bridge = lobby_bridge(page::lobby_page());
        bridge.take_mutations();

        let events = [
            InboundEvent::MoveMade(MoveMadePayload {
                player: "X".into(),
                x: None,
                y: None,
                next_player: None,
            }),
            InboundEvent::GameWon(WinPayload { winner: "X".into() }),
            InboundEvent::ResetBoard,
        ];
        for event in &events {
            let report = bridge.handle_inbound(event);
            assert_eq!(report.handled, 1);
        }
        assert!(bridge.take_mutations().is_empty());
    }
}
