//! Stack transfer, quick stacking and sorting between slot containers.
//!
//! All operations are synchronous and work on `&mut` borrows of the
//! containers involved. They never create or destroy items: every item an
//! operation removes from one slot ends up in another slot.

mod actions;
mod container;
pub mod error;
mod favorite;
mod nearby;
mod options;
mod processor;
mod rename;
mod snapshot;
mod sort;
mod storages;
mod transfer;

pub use actions::*;
pub use container::*;
pub use error::StowageError;
pub use favorite::*;
pub use nearby::*;
pub use options::*;
pub use processor::*;
pub use rename::*;
pub use snapshot::*;
pub use sort::*;
pub use storages::*;
pub use transfer::*;
