use std::time::Duration;

use crate::AttemptStrategy;

/// Attempt strategy used when refreshing instance addresses for the
/// endpoint locator.
pub const ADDRESSES_REFRESH_ATTEMPT: AttemptStrategy =
    AttemptStrategy::new(Duration::from_secs(3 * 60), Duration::from_secs(1));

/// Default port of the control-plane API
pub const DEFAULT_API_PORT: u16 = 17070;

/// Number of undelivered change notifications a watch worker keeps before
/// coalescing
pub const DEFAULT_CHANGES_BUFFER_SIZE: usize = 1;

/// Prefix of instance ids handed out by the in-memory environ
pub const LOCAL_INSTANCE_ID_PREFIX: &str = "i-";

/// Prefix of the cluster identity tag built from the environ UUID
pub const ENVIRON_TAG_PREFIX: &str = "environment-";
