use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::AttemptStrategy;

/// Strategy used by tests that poll for something happening in the
/// background, e.g. the detached remote stop of a dead worker.
pub const LONG_ATTEMPT: AttemptStrategy = AttemptStrategy::new(Duration::from_secs(10), Duration::from_millis(10));

/// How long a test waits for something that should happen
pub const LONG_WAIT: Duration = Duration::from_secs(10);

/// How long a test waits to make sure something does not happen
pub const SHORT_WAIT: Duration = Duration::from_millis(50);

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}
