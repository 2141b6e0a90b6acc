//! # Service Station
//!
//! A bounded-pool, timed-service scheduler.
//!
//! A fixed set of units is spawned once at startup, then cycled through a
//! station with a limited number of service slots. On every activation tick
//! the scheduler picks the first idle unit, binds it to a free slot, drives it
//! there, holds it for a randomized service time, releases the slot, drives it
//! to the exit and resets it to idle at the start point. The loop repeats
//! until shutdown.
//!
//! ## Key Features
//!
//! - **Single-occupancy slots**: a slot is never bound to two units
//! - **One cycle per unit**: only idle units are activated
//! - **Cooperative cancellation**: every wait observes a shared cancellation token
//! - **Virtual time**: an injectable clock and seedable delay source make
//!   scenarios reproducible under a paused tokio runtime
//!
//! ## Example
//!
//! ```rust,ignore
//! use service_station::builders::StationBuilder;
//! use service_station::config::StationConfig;
//! use service_station::runtime::TokioSpawner;
//!
//! let scheduler = StationBuilder::new(StationConfig::from_env()?)
//!     .build(&my_factory, TokioSpawner::current())
//!     .await?;
//!
//! scheduler.spawn_run();
//! // ...
//! scheduler.shutdown();
//! ```
//!
//! Movement, rendering and object instantiation stay outside this crate: they
//! are reached through the [`core::UnitHandle`] and [`core::UnitFactory`] traits.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: units, slots, timing and the service cycle.
pub mod core;
/// Configuration models for the station and its timing.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
