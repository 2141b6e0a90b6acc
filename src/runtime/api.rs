//! API-facing snapshot models.

use serde::{Deserialize, Serialize};

use crate::core::{ServiceScheduler, Spawn, StationStats, UnitState};

/// Serializable view of a station for dashboards and health probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSnapshot {
    /// Counters and occupancy.
    pub stats: StationStats,
    /// State of every unit, in registry order.
    pub units: Vec<UnitState>,
    /// Whether shutdown has been requested.
    pub shutting_down: bool,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Capture the current state of `scheduler`.
pub fn station_snapshot<S>(scheduler: &ServiceScheduler<S>) -> StationSnapshot
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    StationSnapshot {
        stats: scheduler.stats(),
        units: scheduler.unit_states(),
        shutting_down: scheduler.is_shut_down(),
    }
}

/// Health of `scheduler`: healthy while it has not been shut down.
pub fn health<S>(scheduler: &ServiceScheduler<S>) -> Health
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    Health {
        ok: !scheduler.is_shut_down(),
    }
}
