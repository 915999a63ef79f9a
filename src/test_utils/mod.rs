//! the test_utils folder here will share stubs and fixtures between unit
//! tests of the watcher and environs modules
mod common;
mod stub_environ;
mod stub_transport;

pub use common::*;
pub use stub_environ::*;
pub use stub_transport::*;
