//! Tests for completion notifiers

use std::time::Duration;

use service_station::core::{
    BroadcastNotifier, InMemoryNotifier, NoopNotifier, Notifier, ServiceCompletedEvent,
};
use service_station::util::{CycleId, SlotId, UnitId};

fn event(unit: usize) -> ServiceCompletedEvent {
    ServiceCompletedEvent::new(CycleId::new_v4(), UnitId(unit), SlotId(0), Duration::from_secs(3))
}

#[test]
fn test_in_memory_notifier() {
    let notifier = InMemoryNotifier::new(10);
    assert!(notifier.is_empty());

    notifier.emit(event(1));
    assert_eq!(notifier.len(), 1);

    let events = notifier.events();
    assert_eq!(events[0].unit, UnitId(1));
    assert_eq!(events[0].service_time, Duration::from_secs(3));
    assert!(events[0].completed_at_ms > 0);
}

#[test]
fn test_in_memory_notifier_overflow() {
    let notifier = InMemoryNotifier::new(2);

    notifier.emit(event(1));
    notifier.emit(event(2));
    notifier.emit(event(3));

    let events = notifier.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].unit, UnitId(2)); // First one popped
    assert_eq!(events[1].unit, UnitId(3));
}

#[test]
fn test_broadcast_without_subscribers_does_not_fail() {
    let notifier = BroadcastNotifier::new(4);
    notifier.emit(event(1));
    NoopNotifier.emit(event(2));
}

#[tokio::test]
async fn test_broadcast_delivers_to_subscribers() {
    let notifier = BroadcastNotifier::new(4);
    let mut a = notifier.subscribe();
    let mut b = notifier.subscribe();

    let sent = event(5);
    notifier.emit(sent.clone());

    assert_eq!(a.recv().await.unwrap(), sent);
    assert_eq!(b.recv().await.unwrap(), sent);
}

#[test]
fn test_event_serializes_to_json() {
    let sent = event(4);
    let json = serde_json::to_string(&sent).unwrap();
    let back: ServiceCompletedEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sent);
}
