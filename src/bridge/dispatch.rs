//! Subscription tables for inbound events and UI events.
//!
//! [`Dispatcher`] maps each [`EventKind`] to the handlers registered for
//! it; [`DomListeners`] maps an element and a [`DomEventKind`] to its
//! listeners. Handlers run in registration order, each to completion. A
//! handler that fails is logged and skipped; the ones after it still run.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use crate::dom::{Document, NodeId};
use crate::error::BridgeError;
use crate::protocol::{EventKind, InboundEvent, OutboundEvent};

/// Handler for one inbound event kind.
pub type InboundHandler =
    Box<dyn FnMut(&mut Document, &InboundEvent) -> Result<(), BridgeError> + Send>;

/// Listener for one UI event kind on one element.
pub type DomHandler = Box<dyn FnMut(DomContext<'_>) -> Result<(), BridgeError> + Send>;

/// Outcome of running the handlers for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that completed.
    pub handled: usize,
    /// Handlers that returned an error.
    pub failed: usize,
}

impl DispatchReport {
    /// Returns `true` if no handler was registered for the event.
    #[must_use]
    pub const fn is_unhandled(&self) -> bool {
        self.handled == 0 && self.failed == 0
    }

    fn record(&mut self, owner: &str, event: &str, result: Result<(), BridgeError>) {
        match result {
            Ok(()) => self.handled += 1,
            Err(err) => {
                self.failed += 1;
                tracing::error!(
                    owner,
                    event,
                    code = err.error_code(),
                    error = %err,
                    "handler failed"
                );
            }
        }
    }
}

struct Registered<H> {
    owner: &'static str,
    handler: H,
}

/// Inbound subscription table: handlers per event name.
#[derive(Default)]
pub struct Dispatcher {
    handlers: BTreeMap<EventKind, Vec<Registered<InboundHandler>>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, handlers) in &self.handlers {
            let owners: Vec<&str> = handlers.iter().map(|r| r.owner).collect();
            map.entry(&kind.name(), &owners);
        }
        map.finish()
    }
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, after any handler already
    /// registered for it.
    pub fn on<F>(&mut self, owner: &'static str, kind: EventKind, handler: F)
    where
        F: FnMut(&mut Document, &InboundEvent) -> Result<(), BridgeError> + Send + 'static,
    {
        self.handlers.entry(kind).or_default().push(Registered {
            owner,
            handler: Box::new(handler),
        });
    }

    /// Appends every handler of `other` after the ones already registered.
    pub fn merge(&mut self, other: Self) {
        for (kind, handlers) in other.handlers {
            self.handlers.entry(kind).or_default().extend(handlers);
        }
    }

    /// Returns the number of handlers registered for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Runs every handler registered for the event's kind.
    pub fn dispatch(&mut self, doc: &mut Document, event: &InboundEvent) -> DispatchReport {
        let kind = event.kind();
        let mut report = DispatchReport::default();
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            tracing::debug!(event = %kind, "no handler registered");
            return report;
        };
        for registered in handlers {
            let result = (registered.handler)(&mut *doc, event);
            report.record(registered.owner, kind.name(), result);
        }
        report
    }
}

/// UI event delivered by the front-end, addressed by element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// The user typed into an input; its value becomes `value`.
    Input {
        /// Input element id.
        target: String,
        /// New field value.
        value: String,
    },
    /// A form was submitted.
    Submit {
        /// Form element id.
        target: String,
    },
    /// A key was pressed while an element had focus.
    KeyDown {
        /// Focused element id.
        target: String,
        /// Key name, e.g. `"Enter"`.
        key: String,
    },
    /// An element was clicked.
    Click {
        /// Clicked element id.
        target: String,
    },
}

impl DomEvent {
    /// Returns the id of the element the event is aimed at.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Input { target, .. }
            | Self::Submit { target }
            | Self::KeyDown { target, .. }
            | Self::Click { target } => target,
        }
    }

    /// Returns the event's kind.
    #[must_use]
    pub const fn kind(&self) -> DomEventKind {
        match self {
            Self::Input { .. } => DomEventKind::Input,
            Self::Submit { .. } => DomEventKind::Submit,
            Self::KeyDown { .. } => DomEventKind::KeyDown,
            Self::Click { .. } => DomEventKind::Click,
        }
    }

    /// Returns the pressed key for key-down events.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::KeyDown { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Kinds of UI events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventKind {
    /// `input`
    Input,
    /// `submit`
    Submit,
    /// `keydown`
    KeyDown,
    /// `click`
    Click,
}

impl DomEventKind {
    /// Returns the DOM event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Submit => "submit",
            Self::KeyDown => "keydown",
            Self::Click => "click",
        }
    }
}

/// Everything a UI listener may touch while it runs.
#[derive(Debug)]
pub struct DomContext<'a> {
    /// The document.
    pub doc: &'a mut Document,
    /// Queue of emissions for the transport.
    pub outbox: &'a mut Outbox,
    /// The event being handled.
    pub event: &'a DomEvent,
    /// Element the event was aimed at.
    pub target: NodeId,
    /// Element the listener is registered on (`target` or an ancestor).
    pub current_target: NodeId,
}

/// UI listener table: listeners per element and event kind.
#[derive(Default)]
pub struct DomListeners {
    listeners: HashMap<(NodeId, DomEventKind), Vec<Registered<DomHandler>>>,
}

impl fmt::Debug for DomListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomListeners")
            .field("count", &self.len())
            .finish()
    }
}

impl DomListeners {
    /// Creates an empty listener table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind` events on `node`.
    pub fn add<F>(&mut self, owner: &'static str, node: NodeId, kind: DomEventKind, handler: F)
    where
        F: FnMut(DomContext<'_>) -> Result<(), BridgeError> + Send + 'static,
    {
        self.listeners
            .entry((node, kind))
            .or_default()
            .push(Registered {
                owner,
                handler: Box::new(handler),
            });
    }

    /// Appends every listener of `other` after the ones already registered.
    pub fn merge(&mut self, other: Self) {
        for (key, handlers) in other.listeners {
            self.listeners.entry(key).or_default().extend(handlers);
        }
    }

    /// Returns the total number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Returns `true` if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `event` to `target` and then to each of its ancestors,
    /// running the listeners registered on each element along the way.
    pub fn deliver(
        &mut self,
        doc: &mut Document,
        outbox: &mut Outbox,
        event: &DomEvent,
        target: NodeId,
    ) -> DispatchReport {
        let kind = event.kind();
        let mut report = DispatchReport::default();
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            path.push(node);
            current = doc.parent(node);
        }

        for current_target in path {
            let Some(handlers) = self.listeners.get_mut(&(current_target, kind)) else {
                continue;
            };
            for registered in handlers {
                let ctx = DomContext {
                    doc: &mut *doc,
                    outbox: &mut *outbox,
                    event,
                    target,
                    current_target,
                };
                let result = (registered.handler)(ctx);
                report.record(registered.owner, kind.name(), result);
            }
        }
        report
    }
}

/// Emissions queued by UI listeners, drained by the transport.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<OutboundEvent>,
}

impl Outbox {
    /// Queues an emission.
    pub fn emit(&mut self, event: OutboundEvent) {
        tracing::debug!(event = event.name(), "emit");
        self.queue.push_back(event);
    }

    /// Removes and returns every queued emission, oldest first.
    pub fn drain(&mut self) -> Vec<OutboundEvent> {
        self.queue.drain(..).collect()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
