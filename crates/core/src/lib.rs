#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod key;
pub mod sort;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use item::{identity_of, ItemComponents, ItemStack, StackIdentity, DEFAULT_MAX_STACK_SIZE};
pub use key::{ItemKey, ItemKeyError};
pub use sort::SortType;

/// Integer world position of a storage block or entity anchor.
///
/// Ordering is `(x, y, z)` lexical, which keeps position-keyed maps deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// East/west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North/south axis.
    pub z: i32,
}

impl BlockPos {
    /// World origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Squared euclidean distance to `other`.
    pub fn distance_squared(self, other: BlockPos) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        let dz = i64::from(self.z) - i64::from(other.z);
        dx * dx + dy * dy + dz * dz
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
