/*!
 * Scratch Arena
 * Fixed-arena, offset-based scratch allocator with boundary tags
 */

pub mod arena;
pub mod core;

// Re-exports
pub use crate::arena::{
    Arena, ArenaError, ArenaResult, ArenaStats, BlockInfo, FreeListNode, InitError, ScratchAlloc,
    ALIGN_UNIT, BLOCK_HEADER_SIZE, DEFAULT_ARENA_SIZE, RESERVED_BYTES,
};
pub use crate::core::types::{Offset, Size};
