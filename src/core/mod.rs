//! Core scheduling abstractions: units, slots, timing and the service cycle.

pub mod error;
pub mod notifier;
pub mod registry;
pub mod scheduler;
pub mod slot_pool;
pub mod stats;
pub mod timing;
pub mod unit;

pub use error::{AppResult, SchedulerError, SpawnError};
pub use notifier::{
    BroadcastNotifier, InMemoryNotifier, NoopNotifier, Notifier, ServiceCompletedEvent,
};
pub use registry::UnitRegistry;
pub use scheduler::{Collaborators, ServiceScheduler, Spawn};
pub use slot_pool::{ResourceSlot, ResourceSlotPool};
pub use stats::StationStats;
pub use timing::{Clock, DelayRange, DelaySource, MinDelay, RandomDelay, TokioClock};
pub use unit::{Unit, UnitFactory, UnitHandle, UnitState};
