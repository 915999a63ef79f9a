use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_CHANGES_BUFFER_SIZE;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Undelivered change notifications kept per worker. Further changes are
    /// coalesced until the consumer catches up.
    #[serde(default = "default_changes_buffer_size")]
    pub changes_buffer_size: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            changes_buffer_size: default_changes_buffer_size(),
        }
    }
}

impl WatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.changes_buffer_size == 0 {
            return Err(Error::InvalidConfig(
                "watch.changes_buffer_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_changes_buffer_size() -> usize {
    DEFAULT_CHANGES_BUFFER_SIZE
}
