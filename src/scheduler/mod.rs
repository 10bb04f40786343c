//! Scheduler module
//!
//! Drives the bot: one account per tick, a random choice of sides, a fresh
//! quote per order, then a fixed sleep. Strictly sequential.

mod runner;
mod side;

pub use runner::{OrderOutcome, RunSummary, Scheduler, SchedulerState, TickReport};
pub use side::{SidePlan, LOWER_THRESHOLD, UPPER_THRESHOLD};

use crate::account::RotationMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Sleep between ticks (seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Cycle forever or drain the account list once
    #[serde(default)]
    pub rotation: RotationMode,

    /// Stop after this many ticks
    #[serde(default)]
    pub max_ticks: Option<u64>,

    /// Seed for reproducible runs; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            rotation: RotationMode::Cycle,
            max_ticks: None,
            seed: None,
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
