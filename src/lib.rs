//! Control-plane plumbing for a cluster orchestrator.
//!
//! Two independent halves live here:
//!
//! - **Watch bridging**: [`WatchWorker`] turns a remote, polling watch
//!   session ([`WatchTransport`]) into a supervised background task that
//!   publishes change notifications and always closes the remote session.
//! - **Endpoint resolution**: [`locate_endpoint`] finds the control-plane
//!   API of a cluster by asking its [`Environ`] which instances host it and
//!   waiting, within an [`AttemptStrategy`], for them to report addresses.
//!
//! ```ignore
//! let env = LocalEnviron::new("dev", config.cluster.environ_config());
//! env.bootstrap().await?;
//! let endpoint = locate_endpoint(&env).await?;
//! ```

mod config;
pub mod constants;
mod environs;
mod errors;
mod network;
pub mod utils;
mod watcher;

pub use config::*;
pub use environs::*;
pub use errors::*;
pub use network::*;
pub use utils::*;
pub use watcher::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
