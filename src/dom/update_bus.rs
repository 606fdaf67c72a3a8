//! Broadcast channel for document updates.
//!
//! [`UpdateBus`] wraps a [`tokio::sync::broadcast`] channel. After every
//! handled event the run loop publishes the drained [`Mutation`]s, and
//! renderers subscribe to draw them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use super::Mutation;

/// A [`Mutation`] stamped with the time it was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiUpdate {
    /// The change.
    pub mutation: Mutation,
    /// Publication time.
    pub timestamp: DateTime<Utc>,
}

impl UiUpdate {
    /// Stamps `mutation` with the current time.
    #[must_use]
    pub fn now(mutation: Mutation) -> Self {
        Self {
            mutation,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for UiUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.mutation)
    }
}

/// Broadcast bus for [`UiUpdate`]s.
///
/// When the ring buffer is full, the oldest updates are dropped for
/// lagging receivers.
#[derive(Debug, Clone)]
pub struct UpdateBus {
    sender: broadcast::Sender<UiUpdate>,
}

impl UpdateBus {
    /// Creates a new `UpdateBus` with the given channel capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes one update to all subscribers.
    ///
    /// Returns the number of receivers that received it. With no active
    /// receivers the update is silently dropped.
    pub fn publish(&self, update: UiUpdate) -> usize {
        self.sender.send(update).unwrap_or(0)
    }

    /// Stamps and publishes every mutation in order.
    pub fn publish_all(&self, mutations: Vec<Mutation>) {
        for mutation in mutations {
            self.publish(UiUpdate::now(mutation));
        }
    }

    /// Creates a new receiver that will receive all future updates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<UiUpdate> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
