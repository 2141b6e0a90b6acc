//! Runtime adapters and the serializable API surface.

pub mod api;
pub mod tokio_spawner;

pub use api::{health, station_snapshot, Health, StationSnapshot};
pub use tokio_spawner::TokioSpawner;
