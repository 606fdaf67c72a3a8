//! Visible changes recorded by the [`super::Document`].
//!
//! Every write to a connected element produces one [`Mutation`]. The run
//! loop drains them after each handled event and broadcasts them to
//! renderers.

use std::fmt;

use serde::Serialize;

use super::Tag;

/// One visible change to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// A child element was appended to a connected parent.
    ChildAppended {
        /// Parent selector (`#id` or tag name).
        parent: String,
        /// Tag of the appended child.
        tag: Tag,
        /// Text content of the child at the time it was appended.
        text: String,
    },

    /// Text content of a connected element changed.
    TextChanged {
        /// Element selector.
        target: String,
        /// New text content.
        text: String,
    },

    /// Value of a connected input changed.
    ValueChanged {
        /// Element selector.
        target: String,
        /// New value.
        value: String,
    },

    /// Vertical scroll offset of a connected element changed.
    Scrolled {
        /// Element selector.
        target: String,
        /// New scroll offset in rows.
        scroll_top: usize,
    },

    /// The window scrolled.
    WindowScrolled {
        /// New vertical window offset in rows.
        scroll_y: usize,
    },
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChildAppended { parent, tag, text } => {
                write!(f, "{parent} += <{tag}> {text}")
            }
            Self::TextChanged { target, text } => write!(f, "{target} = {text:?}"),
            Self::ValueChanged { target, value } => write!(f, "{target}.value = {value:?}"),
            Self::Scrolled { target, scroll_top } => {
                write!(f, "{target} scrolled to {scroll_top}")
            }
            Self::WindowScrolled { scroll_y } => write!(f, "window scrolled to {scroll_y}"),
        }
    }
}
