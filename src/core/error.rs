//! Error types for scheduler operations.

use thiserror::Error;

use crate::util::types::{SlotId, UnitId};

/// Failure reported by a [`UnitFactory`](crate::core::UnitFactory) while
/// building the initial pool.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("spawn failed: {0}")]
pub struct SpawnError(pub String);

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The unit factory failed while building the initial pool.
    #[error("pool initialization failed: {0}")]
    PoolInit(#[from] SpawnError),
    /// Every slot is occupied.
    #[error("no free slot")]
    NoFreeSlot,
    /// Release was requested for a slot that is already free.
    #[error("{0} is not occupied")]
    SlotNotOccupied(SlotId),
    /// Slot handle outside the pool.
    #[error("unknown {0}")]
    UnknownSlot(SlotId),
    /// Unit handle outside the registry.
    #[error("unknown {0}")]
    UnknownUnit(UnitId),
    /// The cancellation context fired while waiting.
    #[error("cancelled")]
    Cancelled,
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SchedulerError {
    /// Whether this is the cooperative-cancellation result rather than a fault.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
