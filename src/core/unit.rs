//! Pooled units and the collaborator seams that drive them.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::SpawnError;
use crate::util::types::{Orientation, Position, SlotId, UnitId};

/// Lifecycle state of a pooled unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// Parked at the start point, inactive, eligible for activation.
    Idle,
    /// Selected by a tick; waiting for a slot.
    Activating,
    /// Travelling to its slot.
    EnRouteToSlot,
    /// Parked at its slot for the service hold.
    InService,
    /// Travelling to the exit.
    EnRouteToExit,
}

impl UnitState {
    /// Whether the unit may be picked by the next tick.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Activating => "activating",
            Self::EnRouteToSlot => "en_route_to_slot",
            Self::InService => "in_service",
            Self::EnRouteToExit => "en_route_to_exit",
        };
        f.write_str(name)
    }
}

/// Controllable unit instance produced by a [`UnitFactory`].
///
/// Movement itself lives outside the scheduler: it only polls
/// [`move_towards`](UnitHandle::move_towards) once per scheduling frame until
/// the handle reports arrival.
pub trait UnitHandle: Send {
    /// Advance one step toward `target`. Returns `true` once the unit has
    /// arrived at or near it. Must not block.
    fn move_towards(&mut self, target: Position) -> bool;

    /// Reposition instantly, without motion.
    fn teleport_to(&mut self, position: Position);

    /// Toggle visibility/processing.
    fn set_active(&mut self, active: bool);

    /// Current coordinate.
    fn position(&self) -> Position;
}

/// Produces unit instances for the initial pool.
#[async_trait]
pub trait UnitFactory: Send + Sync {
    /// Spawn one unit at the given pose.
    async fn spawn(
        &self,
        position: Position,
        orientation: Orientation,
    ) -> Result<Box<dyn UnitHandle>, SpawnError>;
}

/// Registry record for one pooled unit.
pub struct Unit {
    id: UnitId,
    state: UnitState,
    active: bool,
    slot: Option<SlotId>,
    handle: Box<dyn UnitHandle>,
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("active", &self.active)
            .field("slot", &self.slot)
            .field("position", &self.handle.position())
            .finish()
    }
}

impl Unit {
    /// Wrap a freshly spawned handle as an idle, inactive unit.
    pub(crate) fn new(id: UnitId, mut handle: Box<dyn UnitHandle>) -> Self {
        handle.set_active(false);
        Self {
            id,
            state: UnitState::Idle,
            active: false,
            slot: None,
            handle,
        }
    }

    /// Stable handle.
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> UnitState {
        self.state
    }

    /// Whether the unit is visible/processing.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Slot currently held, if any.
    pub const fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    /// Current coordinate as reported by the handle.
    pub fn position(&self) -> Position {
        self.handle.position()
    }

    pub(crate) fn set_state(&mut self, state: UnitState) {
        tracing::trace!(unit = %self.id, from = %self.state, to = %state, "unit transition");
        self.state = state;
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
        self.handle.set_active(active);
    }

    pub(crate) fn bind_slot(&mut self, slot: Option<SlotId>) {
        self.slot = slot;
    }

    pub(crate) fn move_towards(&mut self, target: Position) -> bool {
        self.handle.move_towards(target)
    }

    /// Teleport to `start`, deactivate, drop any slot binding and go Idle.
    pub(crate) fn reset(&mut self, start: Position) {
        self.handle.teleport_to(start);
        self.set_active(false);
        self.slot = None;
        self.set_state(UnitState::Idle);
    }
}
