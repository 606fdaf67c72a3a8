//! Page layouts expected by the relays.
//!
//! Each `mount_*` function adds one widget to an existing document; the
//! `*_page` functions build a fresh document around them. Building a page
//! does not leave any recorded mutations behind.

use super::{Document, NodeId, Tag};

/// Id of the chat form.
pub const CHAT_FORM: &str = "chat-form";
/// Id of the chat input field.
pub const CHAT_INPUT: &str = "chat-input";
/// Id of the chat message list.
pub const CHAT_MESSAGES: &str = "chat-messages";
/// Id of the tic-tac-toe board container.
pub const BOARD: &str = "tic-tac-toe";
/// Id of the lobby message list.
pub const LOBBY_MESSAGES: &str = "messages";
/// Id of the lobby input field.
pub const LOBBY_INPUT: &str = "messageInput";

/// Number of cells per board side.
pub const BOARD_SIDE: usize = 3;

/// Returns the element id of the cell at `row`, `col` (`cell-{row*3+col}`),
/// or `None` when either coordinate is off the board.
#[must_use]
pub fn cell_id(row: usize, col: usize) -> Option<String> {
    (row < BOARD_SIDE && col < BOARD_SIDE).then(|| format!("cell-{}", row * BOARD_SIDE + col))
}

/// Adds `form#chat-form > input#chat-input` and `ul#chat-messages`.
pub fn mount_chat(doc: &mut Document) {
    let body = doc.body();
    let form = doc.create_element_with_id(Tag::Form, CHAT_FORM);
    let input = doc.create_element_with_id(Tag::Input, CHAT_INPUT);
    let list = doc.create_element_with_id(Tag::Ul, CHAT_MESSAGES);
    doc.append_child(form, input);
    doc.append_child(body, list);
    doc.append_child(body, form);
}

/// Adds `div#tic-tac-toe` holding the nine `div#cell-N` cells.
///
/// Returns the board container.
pub fn mount_board(doc: &mut Document) -> NodeId {
    let body = doc.body();
    let board = doc.create_element_with_id(Tag::Div, BOARD);
    for row in 0..BOARD_SIDE {
        for col in 0..BOARD_SIDE {
            if let Some(id) = cell_id(row, col) {
                let cell = doc.create_element_with_id(Tag::Div, id);
                doc.append_child(board, cell);
            }
        }
    }
    doc.append_child(body, board);
    board
}

/// Adds `ul#messages` and `input#messageInput`.
pub fn mount_lobby(doc: &mut Document) {
    let body = doc.body();
    let list = doc.create_element_with_id(Tag::Ul, LOBBY_MESSAGES);
    let input = doc.create_element_with_id(Tag::Input, LOBBY_INPUT);
    doc.append_child(body, list);
    doc.append_child(body, input);
}

/// Builds a page holding the chat widget.
#[must_use]
pub fn chat_page() -> Document {
    build(mount_chat)
}

/// Builds a page holding the tic-tac-toe board.
#[must_use]
pub fn board_page() -> Document {
    build(|doc| {
        mount_board(doc);
    })
}

/// Builds a page holding the lobby widget.
#[must_use]
pub fn lobby_page() -> Document {
    build(mount_lobby)
}

/// Builds a page holding all three widgets.
#[must_use]
pub fn combined_page() -> Document {
    build(|doc| {
        mount_chat(doc);
        mount_board(doc);
        mount_lobby(doc);
    })
}

fn build(mount: impl FnOnce(&mut Document)) -> Document {
    let mut doc = Document::new();
    mount(&mut doc);
    doc.take_mutations();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ids_are_row_major() {
        assert_eq!(cell_id(0, 0).as_deref(), Some("cell-0"));
        assert_eq!(cell_id(1, 0).as_deref(), Some("cell-3"));
        assert_eq!(cell_id(2, 2).as_deref(), Some("cell-8"));
        assert_eq!(cell_id(3, 0), None);
        assert_eq!(cell_id(0, 3), None);
    }

    #[test]
    fn board_page_has_nine_div_cells() {
        let mut doc = board_page();
        let board = doc.get_element_by_id(BOARD);
        assert!(board.is_some());
        let cells = board.map(|b| doc.children(b).to_vec()).unwrap_or_default();
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|c| doc.tag(*c) == Some(Tag::Div)));
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn combined_page_has_every_widget() {
        let doc = combined_page();
        for id in [
            CHAT_FORM,
            CHAT_INPUT,
            CHAT_MESSAGES,
            BOARD,
            "cell-4",
            LOBBY_MESSAGES,
            LOBBY_INPUT,
        ] {
            assert!(doc.get_element_by_id(id).is_some(), "missing #{id}");
        }
    }

    #[test]
    fn chat_input_lives_inside_the_form() {
        let doc = chat_page();
        let form = doc.get_element_by_id(CHAT_FORM);
        let input = doc.get_element_by_id(CHAT_INPUT);
        assert!(input.is_some());
        assert_eq!(input.and_then(|i| doc.parent(i)), form);
    }
}
