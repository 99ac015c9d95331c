/*!
 * Arena Types
 * Common types for the scratch arena
 */

use crate::core::types::{Offset, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arena operation result
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Arena initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("backing region of {0} bytes is too small to host the arena bookkeeping")]
    RegionTooSmall(usize),

    #[error("backing region of {0} bytes exceeds the 32-bit offset range")]
    RegionTooLarge(usize),
}

/// Arena operation errors
///
/// Out-of-space and double-free are expected conditions surfaced as
/// ordinary values, never panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("out of space: requested {requested} bytes, largest free block {largest_free} bytes")]
    OutOfSpace { requested: Size, largest_free: Size },

    #[error("invalid offset {0}: not a block payload in this arena")]
    InvalidOffset(Offset),

    #[error("double free at offset {0}")]
    DoubleFree(Offset),
}

/// One block as seen by the address-order walk (diagnostic view)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Payload-start offset of the block
    pub offset: Offset,
    pub size: Size,
    pub is_free: bool,
    /// Boundary tag mirrored from the preceding block
    pub prev_size: Size,
    pub prev_is_free: bool,
}

/// One node as seen by the free-list walk (diagnostic view)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeListNode {
    pub offset: Offset,
    pub size: Size,
    pub prev_link: Offset,
    pub next_link: Offset,
}

/// Arena usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaStats {
    /// Total arena size, reserved header included
    pub total_bytes: Size,
    /// Opaque header region at the arena start
    pub reserved_bytes: Size,
    /// Sum of allocated payload sizes
    pub used_bytes: Size,
    /// Sum of free payload sizes
    pub free_bytes: Size,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    /// Largest single free payload, the biggest request that can succeed
    pub largest_free_block: Size,
}
