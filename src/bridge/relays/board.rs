//! Tic-tac-toe relay: cell clicks out, `move` marks in.

use super::{Relay, require};
use crate::bridge::{Dispatcher, DomEventKind, DomListeners};
use crate::dom::page::BOARD;
use crate::dom::{Document, NodeId, Tag};
use crate::error::BridgeError;
use crate::protocol::{EventKind, InboundEvent, OutboundEvent};

/// Relays the tic-tac-toe board.
///
/// - click inside `#tic-tac-toe`: if the clicked element is one of the
///   board's `DIV` cells, emit `move` with the cell id as `position`.
/// - inbound `move`: set the text of the element whose id is `position`
///   to `player`. Unknown positions are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardRelay;

impl Relay for BoardRelay {
    fn name(&self) -> &'static str {
        "board"
    }

    fn install(
        &self,
        doc: &Document,
        dispatcher: &mut Dispatcher,
        listeners: &mut DomListeners,
    ) -> Result<(), BridgeError> {
        let board = require(doc, BOARD)?;

        listeners.add(self.name(), board, DomEventKind::Click, move |ctx| {
            match cell_position(ctx.doc, board, ctx.target) {
                Some(position) => ctx.outbox.emit(OutboundEvent::play(position)),
                None => tracing::debug!(
                    target_element = %ctx.doc.selector(ctx.target),
                    "click outside a board cell"
                ),
            }
            Ok(())
        });

        dispatcher.on(self.name(), EventKind::Move, |doc, event| {
            let InboundEvent::Move(mv) = event else {
                return Ok(());
            };
            match doc.get_element_by_id(&mv.position) {
                Some(cell) => doc.set_text_content(cell, mv.player.as_str()),
                None => tracing::debug!(position = %mv.position, "move for unknown cell"),
            }
            Ok(())
        });

        Ok(())
    }
}

/// Returns the id of `target` if it is a `DIV` cell of `board`.
fn cell_position(doc: &Document, board: NodeId, target: NodeId) -> Option<String> {
    if doc.tag(target) != Some(Tag::Div) || doc.parent(target) != Some(board) {
        return None;
    }
    doc.element_id(target).map(str::to_string)
}
