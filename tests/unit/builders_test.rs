//! Tests for builder modules

use std::sync::Arc;
use std::time::Duration;

use service_station::builders::StationBuilder;
use service_station::config::StationConfig;
use service_station::core::{DelayRange, InMemoryNotifier, MinDelay, UnitState};
use service_station::runtime::TokioSpawner;
use service_station::util::UnitId;

use crate::common::{station_config, ScriptedFactory, Travel};

#[test]
fn test_builder_keeps_config() {
    let builder = StationBuilder::new(StationConfig::default());
    assert_eq!(builder.config().capacity, 8);
    assert_eq!(builder.config().slots.len(), 4);
}

#[test]
fn test_default_delays_follow_seed() {
    let config = StationConfig {
        seed: Some(99),
        ..StationConfig::default()
    };
    let range = DelayRange::new(4.0, 8.0);
    let mut a = StationBuilder::default_delays(&config);
    let mut b = StationBuilder::default_delays(&config);
    for _ in 0..8 {
        assert_eq!(a.next_delay(&range), b.next_delay(&range));
    }
}

#[tokio::test(start_paused = true)]
async fn test_builder_spawns_full_pool() {
    let factory = ScriptedFactory::new(Travel::Instant);
    let notifier = Arc::new(InMemoryNotifier::new(4));

    let scheduler = StationBuilder::new(station_config(5, 2, 5.0, 1.0))
        .with_delays(Box::new(MinDelay))
        .with_notifier(notifier.clone())
        .build(&factory, TokioSpawner::current())
        .await
        .unwrap();

    assert_eq!(factory.spawned(), 5);
    assert_eq!(scheduler.unit_states(), vec![UnitState::Idle; 5]);
    assert_eq!(scheduler.stats().slot_count, 2);

    scheduler.tick();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(notifier.len(), 1);
    assert_eq!(scheduler.unit_state(UnitId(0)).unwrap(), UnitState::Idle);
}
