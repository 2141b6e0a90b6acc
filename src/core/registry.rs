//! Bounded collection of every pooled unit.

use crate::core::unit::{Unit, UnitFactory, UnitState};
use crate::core::SchedulerError;
use crate::util::types::{Pose, UnitId};

/// All units, built once at startup and indexed by [`UnitId`].
///
/// Idle lookup is a linear scan in registry order, so lower-indexed idle
/// units are always preferred.
#[derive(Debug)]
pub struct UnitRegistry {
    units: Vec<Unit>,
}

impl UnitRegistry {
    /// Spawn exactly `capacity` units at `start` through `factory`.
    ///
    /// Any factory failure aborts initialization; no partial registry is
    /// returned.
    pub async fn initialize(
        capacity: usize,
        factory: &dyn UnitFactory,
        start: Pose,
    ) -> Result<Self, SchedulerError> {
        let mut units = Vec::with_capacity(capacity);
        for index in 0..capacity {
            let handle = factory
                .spawn(start.position, start.orientation)
                .await
                .map_err(|e| {
                    tracing::error!(index, error = %e, "unit spawn failed");
                    SchedulerError::PoolInit(e)
                })?;
            units.push(Unit::new(UnitId(index), handle));
        }
        tracing::info!(capacity, "unit pool initialized");
        Ok(Self { units })
    }

    /// First idle unit in registry order.
    pub fn find_idle(&self) -> Option<UnitId> {
        self.units
            .iter()
            .find(|unit| unit.state().is_idle())
            .map(Unit::id)
    }

    /// Number of units in the pool.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the pool holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of units currently idle.
    pub fn idle_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.state().is_idle()).count()
    }

    /// Look up a unit.
    pub fn get(&self, id: UnitId) -> Result<&Unit, SchedulerError> {
        self.units.get(id.0).ok_or(SchedulerError::UnknownUnit(id))
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Result<&mut Unit, SchedulerError> {
        self.units.get_mut(id.0).ok_or(SchedulerError::UnknownUnit(id))
    }

    /// State of one unit.
    pub fn state(&self, id: UnitId) -> Result<UnitState, SchedulerError> {
        self.get(id).map(Unit::state)
    }

    /// States of every unit in registry order.
    pub fn states(&self) -> Vec<UnitState> {
        self.units.iter().map(Unit::state).collect()
    }

    /// Iterate units in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }
}
