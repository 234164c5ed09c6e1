#![warn(missing_docs)]
//! Test support for the stowage crates: slot-notation fixtures and golden snapshots.

mod fixtures;
mod snapshot;

pub use fixtures::*;
pub use snapshot::*;
