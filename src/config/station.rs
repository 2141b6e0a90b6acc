//! Station configuration structures.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::error::AppResult;
use crate::core::timing::DelayRange;
use crate::util::types::{Pose, Position};

/// Environment variable naming a JSON station configuration file.
pub const CONFIG_ENV_VAR: &str = "STATION_CONFIG";

const fn default_frame_interval_ms() -> u64 {
    16
}

/// Full configuration surface of one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Number of pooled units, fixed at construction.
    pub capacity: usize,
    /// Interval between activation ticks.
    pub activation_delay: DelayRange,
    /// Length of the service hold at a slot.
    pub service_delay: DelayRange,
    /// Where units spawn and are reset to after each cycle.
    pub start: Pose,
    /// Where units drive to after service.
    pub exit: Position,
    /// One coordinate per service slot.
    pub slots: Vec<Position>,
    /// Granularity of move-until-arrived polling, in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Seed for the delay generator; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for StationConfig {
    /// Eight units, four slots, activation every [4, 8) s, service [2, 4) s.
    fn default() -> Self {
        Self {
            capacity: 8,
            activation_delay: DelayRange::new(4.0, 8.0),
            service_delay: DelayRange::new(2.0, 4.0),
            start: Pose::at(Position::new(0.0, 0.0, -20.0)),
            exit: Position::new(0.0, 0.0, 20.0),
            slots: vec![
                Position::new(-6.0, 0.0, 0.0),
                Position::new(-2.0, 0.0, 0.0),
                Position::new(2.0, 0.0, 0.0),
                Position::new(6.0, 0.0, 0.0),
            ],
            frame_interval_ms: default_frame_interval_ms(),
            seed: None,
        }
    }
}

impl StationConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.slots.is_empty() {
            return Err("at least one slot must be defined".into());
        }
        if self.frame_interval_ms == 0 {
            return Err("frame_interval_ms must be greater than 0".into());
        }
        self.activation_delay
            .validate()
            .map_err(|e| format!("activation_delay invalid: {e}"))?;
        self.service_delay
            .validate()
            .map_err(|e| format!("service_delay invalid: {e}"))?;
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading station config {}", path.display()))?;
        Self::from_json_str(&raw).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }

    /// Load `.env` if present, then read the file named by
    /// [`CONFIG_ENV_VAR`]. Falls back to [`StationConfig::default`] when the
    /// variable is unset.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("loading .env");
            }
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_json_file(path),
            Err(std::env::VarError::NotPresent) => {
                tracing::debug!("{CONFIG_ENV_VAR} unset, using default station config");
                Ok(Self::default())
            }
            Err(e) => Err(e).context(CONFIG_ENV_VAR),
        }
    }

    /// Frame interval as a `Duration`.
    pub const fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_interval_ms)
    }
}
