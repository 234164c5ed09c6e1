use stowage_core::BlockPos;
use thiserror::Error;

/// Precondition failures reported by engine operations.
///
/// A stack that simply does not fit is never an error; these variants only
/// describe caller misuse or unsupported targets, and an operation that
/// returns one of them has not mutated anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StowageError {
    /// The container is smaller than the range the operation needs.
    #[error("container has {actual} slots but the operation requires at least {required}")]
    ContainerTooSmall { required: usize, actual: usize },
    /// The same storage appeared twice in a nearby-storage list.
    #[error("storage at {0} was discovered more than once")]
    DuplicateStorage(BlockPos),
    /// No storage is registered at the position.
    #[error("no storage at {0}")]
    StorageNotFound(BlockPos),
    /// The storage cannot be renamed.
    #[error("the storage at {0} is not supported for renaming")]
    UnsupportedStorage(BlockPos),
    /// Item favoriting is turned off.
    #[error("item favoriting is disabled")]
    FavoritingDisabled,
    /// The slot index does not exist in the container.
    #[error("slot {slot} is out of range for a container of {size} slots")]
    SlotOutOfRange { slot: usize, size: usize },
    /// The slot holds no stack.
    #[error("slot {0} is empty")]
    EmptySlot(usize),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, StowageError>;
