//! Clock and randomized delay sources.
//!
//! The scheduler never calls `tokio::time` directly: it suspends through a
//! [`Clock`] and draws every interval from a [`DelaySource`]. With
//! [`TokioClock`] under a paused runtime (`tokio::time::pause`) whole service
//! scenarios run in virtual time, and a seeded [`RandomDelay`] makes them
//! reproducible.

use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Half-open interval `[min_secs, max_secs)` of seconds.
///
/// A degenerate range (`min_secs == max_secs`) always yields `min_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    /// Inclusive lower bound in seconds.
    pub min_secs: f64,
    /// Exclusive upper bound in seconds.
    pub max_secs: f64,
}

impl DelayRange {
    /// Range `[min_secs, max_secs)`.
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Range that always yields `secs`.
    pub const fn fixed(secs: f64) -> Self {
        Self::new(secs, secs)
    }

    /// Check bounds are finite, non-negative, ordered and representable as a
    /// [`Duration`].
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_secs.is_finite() || !self.max_secs.is_finite() {
            return Err("delay bounds must be finite".into());
        }
        if self.max_secs > Duration::MAX.as_secs_f64() {
            return Err(format!("max_secs ({}) exceeds the longest delay", self.max_secs));
        }
        if self.min_secs < 0.0 {
            return Err("min_secs must not be negative".into());
        }
        if self.max_secs < self.min_secs {
            return Err(format!(
                "max_secs ({}) must not be less than min_secs ({})",
                self.max_secs, self.min_secs
            ));
        }
        Ok(())
    }

    /// Whether the range collapses to a single value.
    pub fn is_fixed(&self) -> bool {
        self.max_secs <= self.min_secs
    }
}

/// Negative or NaN input maps to zero, oversized input saturates.
fn to_duration(secs: f64) -> Duration {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Source of bounded delays.
pub trait DelaySource: Send {
    /// Draw the next delay from `range`.
    fn next_delay(&mut self, range: &DelayRange) -> Duration;
}

/// Uniform random delays from a seedable generator.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    rng: StdRng,
}

impl RandomDelay {
    /// Reproducible source seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DelaySource for RandomDelay {
    fn next_delay(&mut self, range: &DelayRange) -> Duration {
        if range.is_fixed() {
            return to_duration(range.min_secs);
        }
        to_duration(self.rng.random_range(range.min_secs..range.max_secs))
    }
}

/// Always yields the lower bound of the requested range.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinDelay;

impl DelaySource for MinDelay {
    fn next_delay(&mut self, range: &DelayRange) -> Duration {
        to_duration(range.min_secs)
    }
}

/// Suspension provider.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by `tokio::time`; honours a paused runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
