mod attempt;
pub mod namespace;

pub use attempt::*;
