//! Tests for the unit registry

use service_station::core::{SchedulerError, UnitRegistry, UnitState};
use service_station::util::{Pose, UnitId};

use crate::common::{Command, ScriptedFactory, Travel, START};

#[tokio::test]
async fn test_initialize_spawns_idle_inactive_units() {
    let factory = ScriptedFactory::new(Travel::Instant);
    let registry = UnitRegistry::initialize(4, &factory, Pose::at(START))
        .await
        .unwrap();

    assert_eq!(registry.len(), 4);
    assert_eq!(registry.idle_count(), 4);
    assert_eq!(registry.states(), vec![UnitState::Idle; 4]);
    for unit in registry.iter() {
        assert!(!unit.is_active());
        assert_eq!(unit.position(), START);
        assert_eq!(unit.slot(), None);
    }
    assert_eq!(factory.log(2), vec![Command::SetActive(false)]);
}

#[tokio::test]
async fn test_find_idle_is_first_in_registry_order() {
    let factory = ScriptedFactory::new(Travel::Instant);
    let registry = UnitRegistry::initialize(3, &factory, Pose::at(START))
        .await
        .unwrap();
    assert_eq!(registry.find_idle(), Some(UnitId(0)));
}

#[tokio::test]
async fn test_initialize_fails_without_partial_pool() {
    let factory = ScriptedFactory::failing_at(Travel::Instant, 0);
    let result = UnitRegistry::initialize(2, &factory, Pose::at(START)).await;
    assert!(matches!(result, Err(SchedulerError::PoolInit(_))));
}

#[tokio::test]
async fn test_unknown_unit_lookup() {
    let factory = ScriptedFactory::new(Travel::Instant);
    let registry = UnitRegistry::initialize(1, &factory, Pose::at(START))
        .await
        .unwrap();
    assert!(matches!(
        registry.state(UnitId(1)),
        Err(SchedulerError::UnknownUnit(UnitId(1)))
    ));
}

#[tokio::test]
async fn test_empty_registry_has_no_idle_unit() {
    let factory = ScriptedFactory::new(Travel::Instant);
    let registry = UnitRegistry::initialize(0, &factory, Pose::at(START))
        .await
        .unwrap();
    assert!(registry.is_empty());
    assert_eq!(registry.find_idle(), None);
}
