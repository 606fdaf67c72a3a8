//! UI mirror: the document the bridge reads from and writes to.
//!
//! Outside a browser the DOM becomes an explicit struct owned by the
//! bridge. Handlers are its only writers; renderers observe it through the
//! [`Mutation`]s it records.

pub mod document;
pub mod mutation;
pub mod page;
pub mod update_bus;

use std::fmt;

use serde::Serialize;

pub use document::Document;
pub use mutation::Mutation;
pub use update_bus::{UiUpdate, UpdateBus};

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Element tag names used by the relays' pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    /// Document body.
    Body,
    /// Form.
    Form,
    /// Text input.
    Input,
    /// Unordered list.
    Ul,
    /// List item.
    Li,
    /// Generic block; board cells are `DIV`s.
    Div,
}

impl Tag {
    /// Returns the upper-case tag name, as `tagName` reports it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Body => "BODY",
            Self::Form => "FORM",
            Self::Input => "INPUT",
            Self::Ul => "UL",
            Self::Li => "LI",
            Self::Div => "DIV",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
