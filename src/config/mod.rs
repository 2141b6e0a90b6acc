//! Configuration models for the station and its timing.

pub mod station;

pub use station::{StationConfig, CONFIG_ENV_VAR};
