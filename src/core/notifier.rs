//! Service-completion notifications for external observers.
//!
//! Notifiers are fire-and-forget: `emit` must not block and has no failure
//! mode visible to the service cycle.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::util::clock::now_ms;
use crate::util::types::{CycleId, SlotId, UnitId};

/// Emitted when a unit leaves its slot after the service hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCompletedEvent {
    /// Cycle that completed service.
    pub cycle_id: CycleId,
    /// Serviced unit.
    pub unit: UnitId,
    /// Slot it was serviced at.
    pub slot: SlotId,
    /// Length of the service hold.
    pub service_time: Duration,
    /// Wall-clock timestamp in milliseconds.
    pub completed_at_ms: u128,
}

impl ServiceCompletedEvent {
    /// Build an event stamped with the current wall-clock time.
    pub fn new(cycle_id: CycleId, unit: UnitId, slot: SlotId, service_time: Duration) -> Self {
        Self {
            cycle_id,
            unit,
            slot,
            service_time,
            completed_at_ms: now_ms(),
        }
    }
}

/// Observer sink for completion events.
pub trait Notifier: Send + Sync {
    /// Publish an event. Must not block.
    fn emit(&self, event: ServiceCompletedEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn emit(&self, _event: ServiceCompletedEvent) {}
}

/// In-memory notifier for testing and dev. Keeps the most recent events.
#[derive(Debug)]
pub struct InMemoryNotifier {
    events: Mutex<VecDeque<ServiceCompletedEvent>>,
    max_events: usize,
}

impl InMemoryNotifier {
    /// Create a notifier with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(max_events)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events, oldest first.
    pub fn events(&self) -> Vec<ServiceCompletedEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether no event is stored.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Notifier for InMemoryNotifier {
    fn emit(&self, event: ServiceCompletedEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Fans events out over a `tokio::sync::broadcast` channel.
///
/// Slow subscribers lag and skip ahead; having no subscriber is not an error.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<ServiceCompletedEvent>,
}

impl BroadcastNotifier {
    /// Create a notifier whose channel buffers `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceCompletedEvent> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn emit(&self, event: ServiceCompletedEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no subscribers for service completion");
        }
    }
}
