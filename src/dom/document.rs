//! Arena-backed document: the single store of visible UI state.
//!
//! [`Document`] holds every element in a `Vec` indexed by [`NodeId`], plus
//! an id index for `get_element_by_id` lookups. Only elements connected to
//! the body are visible: lookups skip detached elements and writes to them
//! are not recorded as [`Mutation`]s.

use std::collections::HashMap;

use super::{Mutation, NodeId, Tag};

#[derive(Debug, Clone)]
struct Element {
    tag: Tag,
    id: Option<String>,
    text: String,
    value: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    scroll_top: usize,
}

impl Element {
    fn new(tag: Tag, id: Option<String>) -> Self {
        Self {
            tag,
            id,
            text: String::new(),
            value: String::new(),
            children: Vec::new(),
            parent: None,
            scroll_top: 0,
        }
    }
}

/// In-memory element tree standing in for the browser DOM.
///
/// The bridge is its only writer. Node handles are plain indices; a handle
/// from another document simply resolves to nothing.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    ids: HashMap<String, Vec<NodeId>>,
    body: NodeId,
    window_scroll_y: usize,
    mutations: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document containing only an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new(Tag::Body, None)],
            ids: HashMap::new(),
            body: NodeId(0),
            window_scroll_y: 0,
            mutations: Vec::new(),
        }
    }

    /// Returns the body element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        self.push(Element::new(tag, None))
    }

    /// Creates a detached element carrying an id attribute.
    pub fn create_element_with_id(&mut self, tag: Tag, id: impl Into<String>) -> NodeId {
        let id = id.into();
        let node = self.push(Element::new(tag, Some(id.clone())));
        self.ids.entry(id).or_default().push(node);
        node
    }

    fn push(&mut self, element: Element) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(element);
        node
    }

    /// Returns the first connected element with the given id, in creation
    /// order.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids
            .get(id)?
            .iter()
            .copied()
            .find(|node| self.is_connected(*node))
    }

    /// Returns `true` if the node is the body or a descendant of it.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.body {
                return true;
            }
            current = self.element(n).and_then(|e| e.parent);
        }
        false
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// Returns `false` and changes nothing if either handle is unknown, or
    /// if `child` is `parent` itself or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.element(parent).is_none() || self.element(child).is_none() {
            return false;
        }
        if self.is_inclusive_ancestor(child, parent) {
            return false;
        }
        if let Some(old_parent) = self.element(child).and_then(|e| e.parent) {
            self.detach(old_parent, child);
        }
        if let Some(p) = self.element_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.element_mut(child) {
            c.parent = Some(parent);
        }

        if self.is_connected(parent) {
            let mutation = Mutation::ChildAppended {
                parent: self.selector(parent),
                tag: self.tag(child).unwrap_or(Tag::Div),
                text: self.text_content(child).unwrap_or_default().to_string(),
            };
            self.mutations.push(mutation);
        }
        true
    }

    /// Removes `child` from `parent`. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let is_child = self.element(child).and_then(|e| e.parent) == Some(parent);
        if is_child {
            self.detach(parent, child);
        }
        is_child
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.element_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.element_mut(child) {
            c.parent = None;
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.element(n).and_then(|e| e.parent);
        }
        false
    }

    /// Returns the element's tag.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<Tag> {
        self.element(node).map(|e| e.tag)
    }

    /// Returns the element's id attribute.
    #[must_use]
    pub fn element_id(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.id.as_deref()
    }

    /// Returns the element's parent.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node)?.parent
    }

    /// Returns the element's children in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns the element's own text content.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.text.as_str())
    }

    /// Replaces the element's text content.
    pub fn set_text_content(&mut self, node: NodeId, text: impl Into<String>) {
        let text = text.into();
        let Some(element) = self.element_mut(node) else {
            return;
        };
        element.text.clone_from(&text);
        if self.is_connected(node) {
            let target = self.selector(node);
            self.mutations.push(Mutation::TextChanged { target, text });
        }
    }

    /// Returns the element's form value.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.value.as_str())
    }

    /// Replaces the element's form value.
    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        let value = value.into();
        let Some(element) = self.element_mut(node) else {
            return;
        };
        element.value.clone_from(&value);
        if self.is_connected(node) {
            let target = self.selector(node);
            self.mutations.push(Mutation::ValueChanged { target, value });
        }
    }

    /// Returns the scrollable height of the element, one row per
    /// descendant.
    #[must_use]
    pub fn scroll_height(&self, node: NodeId) -> usize {
        self.children(node)
            .iter()
            .map(|child| 1 + self.scroll_height(*child))
            .sum()
    }

    /// Returns the element's vertical scroll offset.
    #[must_use]
    pub fn scroll_top(&self, node: NodeId) -> usize {
        self.element(node).map_or(0, |e| e.scroll_top)
    }

    /// Sets the element's vertical scroll offset, clamped to its scroll
    /// height.
    pub fn set_scroll_top(&mut self, node: NodeId, scroll_top: usize) {
        let clamped = scroll_top.min(self.scroll_height(node));
        let Some(element) = self.element_mut(node) else {
            return;
        };
        element.scroll_top = clamped;
        if self.is_connected(node) {
            let target = self.selector(node);
            self.mutations.push(Mutation::Scrolled {
                target,
                scroll_top: clamped,
            });
        }
    }

    /// Returns the window's vertical scroll offset.
    #[must_use]
    pub const fn window_scroll_y(&self) -> usize {
        self.window_scroll_y
    }

    /// Scrolls the window, clamped to the body's scroll height.
    pub fn scroll_window_to(&mut self, scroll_y: usize) {
        let clamped = scroll_y.min(self.scroll_height(self.body));
        self.window_scroll_y = clamped;
        self.mutations
            .push(Mutation::WindowScrolled { scroll_y: clamped });
    }

    /// Drains the mutations recorded since the last call.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Returns the `#id` selector of the element, or its tag name when it
    /// has no id.
    #[must_use]
    pub fn selector(&self, node: NodeId) -> String {
        match self.element(node) {
            Some(Element { id: Some(id), .. }) => format!("#{id}"),
            Some(e) => e.tag.to_string(),
            None => String::from("?"),
        }
    }

    /// Returns the text of each child of `node`, in order.
    #[must_use]
    pub fn child_texts(&self, node: NodeId) -> Vec<&str> {
        self.children(node)
            .iter()
            .filter_map(|child| self.text_content(*child))
            .collect()
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }
}
