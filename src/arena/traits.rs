/*!
 * Arena Traits
 * Allocator abstractions
 */

use super::types::ArenaResult;
use crate::core::types::{Offset, Size};

/// Scratch allocator interface
///
/// The seam between the engine and its collaborators (drivers,
/// harnesses, benches), so they can be written against the interface
/// rather than the concrete arena.
pub trait ScratchAlloc: Send + Sync {
    /// Allocate a block of at least `size` bytes
    fn allocate(&self, size: Size) -> ArenaResult<Offset>;

    /// Release a previously returned offset
    fn free(&self, offset: Offset) -> ArenaResult<()>;

    /// Check if an offset names a live allocation
    fn is_valid(&self, offset: Offset) -> bool;

    /// Get the payload size of a live allocation
    fn block_size(&self, offset: Offset) -> Option<Size>;
}
