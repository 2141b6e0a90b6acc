//! Tests for utility types

use service_station::util::{now_ms, Orientation, Pose, Position, SlotId, UnitId};

#[test]
fn test_handle_display() {
    assert_eq!(UnitId(4).to_string(), "unit-4");
    assert_eq!(SlotId(0).to_string(), "slot-0");
}

#[test]
fn test_position_distance() {
    let a = Position::new(0.0, 0.0, 0.0);
    let b = Position::new(3.0, 4.0, 0.0);
    assert!((a.distance(&b) - 5.0).abs() < f32::EPSILON);
}

#[test]
fn test_pose_defaults_to_identity_orientation() {
    let pose = Pose::at(Position::new(1.0, 2.0, 3.0));
    assert_eq!(pose.orientation, Orientation::IDENTITY);
    assert_eq!(Pose::default().orientation, Orientation::IDENTITY);
}

#[test]
fn test_now_ms_is_after_epoch() {
    assert!(now_ms() > 0);
}

#[test]
fn test_init_tracing_is_idempotent() {
    service_station::util::init_tracing();
    service_station::util::init_tracing();
    tracing::info!("tracing initialized");
}
