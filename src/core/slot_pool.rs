//! Fixed-capacity pool of service slots.
//!
//! Each slot has a fixed coordinate and is either free or held by exactly one
//! unit. The pool never grows or shrinks after construction.

use crate::core::SchedulerError;
use crate::util::types::{Position, SlotId, UnitId};

/// One service position at the station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSlot {
    /// Stable handle.
    pub id: SlotId,
    /// Where a unit parks to be serviced.
    pub position: Position,
}

#[derive(Debug)]
struct SlotEntry {
    slot: ResourceSlot,
    occupant: Option<UnitId>,
}

/// Slot allocator with single-occupancy accounting.
///
/// Not internally synchronized; the scheduler wraps it in a
/// `parking_lot::Mutex` and never holds the guard across an await point.
#[derive(Debug)]
pub struct ResourceSlotPool {
    entries: Vec<SlotEntry>,
    occupied: usize,
}

impl ResourceSlotPool {
    /// Create a pool with one free slot per coordinate, in order.
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Self {
        let entries = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| SlotEntry {
                slot: ResourceSlot {
                    id: SlotId(index),
                    position,
                },
                occupant: None,
            })
            .collect();
        Self {
            entries,
            occupied: 0,
        }
    }

    /// Bind the lowest-indexed free slot to `unit`.
    pub fn acquire_free_slot(&mut self, unit: UnitId) -> Result<ResourceSlot, SchedulerError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.occupant.is_none())
            .ok_or(SchedulerError::NoFreeSlot)?;
        entry.occupant = Some(unit);
        self.occupied += 1;
        tracing::debug!(slot = %entry.slot.id, %unit, occupied = self.occupied, "slot acquired");
        Ok(entry.slot)
    }

    /// Free `slot`, returning the unit that held it.
    pub fn release_slot(&mut self, slot: SlotId) -> Result<UnitId, SchedulerError> {
        let entry = self
            .entries
            .get_mut(slot.0)
            .ok_or(SchedulerError::UnknownSlot(slot))?;
        let unit = entry
            .occupant
            .take()
            .ok_or(SchedulerError::SlotNotOccupied(slot))?;
        self.occupied -= 1;
        tracing::debug!(%slot, %unit, occupied = self.occupied, "slot released");
        Ok(unit)
    }

    /// Look up a slot by handle.
    pub fn slot(&self, slot: SlotId) -> Option<ResourceSlot> {
        self.entries.get(slot.0).map(|entry| entry.slot)
    }

    /// Unit currently bound to `slot`, if any.
    pub fn occupant(&self, slot: SlotId) -> Option<UnitId> {
        self.entries.get(slot.0).and_then(|entry| entry.occupant)
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of occupied slots.
    pub const fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Number of free slots.
    pub fn free_count(&self) -> usize {
        self.capacity() - self.occupied
    }
}
