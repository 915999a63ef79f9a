use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::AttemptStrategy;
use crate::Error;
use crate::Result;

/// Bounded attempt schedule template
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPolicy {
    /// Total time budget of the schedule (unit: milliseconds)
    #[serde(default = "default_total_ms")]
    pub total_ms: u64,

    /// Fixed delay between attempts (unit: milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Attempts made even when the budget is already spent
    #[serde(default)]
    pub min_attempts: usize,
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self {
            total_ms: default_total_ms(),
            delay_ms: default_delay_ms(),
            min_attempts: 0,
        }
    }
}

impl AttemptPolicy {
    pub fn validate(
        &self,
        name: &str,
    ) -> Result<()> {
        if self.delay_ms == 0 {
            return Err(Error::InvalidConfig(format!("{}.delay_ms must be greater than 0", name)));
        }
        if self.total_ms < self.delay_ms {
            return Err(Error::InvalidConfig(format!(
                "{}.total_ms ({}) must not be shorter than delay_ms ({})",
                name, self.total_ms, self.delay_ms
            )));
        }
        Ok(())
    }

    pub fn strategy(&self) -> AttemptStrategy {
        AttemptStrategy::new(Duration::from_millis(self.total_ms), Duration::from_millis(self.delay_ms))
            .with_min(self.min_attempts)
    }
}

impl From<&AttemptPolicy> for AttemptStrategy {
    fn from(policy: &AttemptPolicy) -> Self {
        policy.strategy()
    }
}

/// Attempt policies divided by domain
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RetryPolicies {
    /// Waiting for control-plane instances to report addresses
    #[serde(default)]
    pub addresses_refresh: AttemptPolicy,
}

impl RetryPolicies {
    pub fn validate(&self) -> Result<()> {
        self.addresses_refresh.validate("retry.addresses_refresh")
    }
}

fn default_total_ms() -> u64 {
    3 * 60 * 1000
}
fn default_delay_ms() -> u64 {
    1000
}
