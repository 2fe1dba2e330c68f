//! Timeline store: append-only event collection for one session.

use serde::{Deserialize, Serialize};

use crate::types::CanonicalEvent;

/// Append-only collection of canonical events.
///
/// Insertion order is adapter completion order, not chronological
/// order; the merger produces the total order. Events are never
/// mutated or removed individually; `clear` is the whole-session reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineStore {
    events: Vec<CanonicalEvent>,
}

impl TimelineStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn append(&mut self, event: CanonicalEvent) {
        self.events.push(event);
    }

    /// Append a batch of events (one normalized raw record's worth).
    pub fn extend(&mut self, events: impl IntoIterator<Item = CanonicalEvent>) {
        self.events.extend(events);
    }

    /// Events in insertion order.
    pub fn events(&self) -> &[CanonicalEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whole-session reset.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
