//! Station utilization counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time view of the station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationStats {
    /// Units in the pool.
    pub capacity: usize,
    /// Service slots at the station.
    pub slot_count: usize,
    /// Units currently idle.
    pub idle_units: usize,
    /// Slots currently occupied.
    pub occupied_slots: usize,
    /// Activation ticks fired.
    pub ticks: u64,
    /// Ticks that started a cycle.
    pub activations: u64,
    /// Cycles that returned their unit to idle normally.
    pub completed_cycles: u64,
    /// Cycles aborted by a slot error.
    pub aborted_cycles: u64,
    /// Cycles abandoned on shutdown.
    pub cancelled_cycles: u64,
}

/// Lock-free counters shared by the activation loop and every cycle task.
#[derive(Debug, Default)]
pub(crate) struct StationCounters {
    pub ticks: AtomicU64,
    pub activations: AtomicU64,
    pub completed_cycles: AtomicU64,
    pub aborted_cycles: AtomicU64,
    pub cancelled_cycles: AtomicU64,
}

impl StationCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot counters together with the live occupancy figures.
    pub fn snapshot(
        &self,
        capacity: usize,
        slot_count: usize,
        idle_units: usize,
        occupied_slots: usize,
    ) -> StationStats {
        StationStats {
            capacity,
            slot_count,
            idle_units,
            occupied_slots,
            ticks: self.ticks.load(Ordering::Relaxed),
            activations: self.activations.load(Ordering::Relaxed),
            completed_cycles: self.completed_cycles.load(Ordering::Relaxed),
            aborted_cycles: self.aborted_cycles.load(Ordering::Relaxed),
            cancelled_cycles: self.cancelled_cycles.load(Ordering::Relaxed),
        }
    }
}
