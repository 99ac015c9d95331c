/*!
 * Arena Module
 * Fixed-size scratch region carved into boundary-tagged blocks
 *
 * The arena is one contiguous buffer: an opaque reserved header
 * followed by the allocatable extent, organized as a gapless chain of
 * blocks. Two views cover the same bytes and must always agree: the
 * address-ordered chain implied by the size fields, and the explicit
 * free list threaded through free payloads.
 */

pub mod allocator;
pub mod block;
pub mod free_list;
pub mod traits;
pub mod types;

pub use traits::ScratchAlloc;
pub use types::{ArenaError, ArenaResult, ArenaStats, BlockInfo, FreeListNode, InitError};

use crate::core::sync::SpinLock;
use crate::core::types::{Offset, Size};
use block::{BlockHeader, FIRST_HEADER, HEADER_SIZE, MIN_ALIGN, RESERVED_HEADER};
use log::{info, warn};
use std::sync::Arc;

/// Default arena size in bytes, reserved header included
pub const DEFAULT_ARENA_SIZE: usize = 4096;

/// Bytes of bookkeeping per block
pub const BLOCK_HEADER_SIZE: usize = HEADER_SIZE as usize;

/// Fixed payload alignment unit (two link words)
pub const ALIGN_UNIT: usize = MIN_ALIGN as usize;

/// Opaque reserved region at the arena start
pub const RESERVED_BYTES: usize = RESERVED_HEADER as usize;

/// Locked bookkeeping for one arena
pub(crate) struct ArenaState {
    /// The backing region; blocks and free-list links are views into
    /// it, never separately allocated
    pub(crate) buf: Box<[u8]>,
    /// End of the allocatable extent (a trailing unalignable tail of
    /// the backing region is left outside the block chain)
    pub(crate) end: u32,
    /// Payload offset of the free-list head, zero when the list is empty
    pub(crate) free_head: u32,
}

/// Handle to one scratch arena
///
/// The handle is the explicit context threaded through all calls;
/// clones share the same arena. Every operation, introspection
/// included, holds the arena's spin lock for its full duration.
pub struct Arena {
    state: Arc<SpinLock<ArenaState>>,
}

impl Arena {
    /// Initialize an arena over `backing`, or over a fresh
    /// `DEFAULT_ARENA_SIZE` buffer from the ambient allocator.
    ///
    /// Installs a single free block spanning the whole allocatable
    /// extent, with the free list containing exactly that block.
    pub fn init(backing: Option<Vec<u8>>) -> Result<Self, InitError> {
        let buf = backing.unwrap_or_else(|| vec![0u8; DEFAULT_ARENA_SIZE]);
        let total = buf.len();

        if total > u32::MAX as usize {
            return Err(InitError::RegionTooLarge(total));
        }
        let overhead = (RESERVED_HEADER + HEADER_SIZE + MIN_ALIGN) as usize;
        if total < overhead {
            return Err(InitError::RegionTooSmall(total));
        }

        let initial_size = (total as u32 - FIRST_HEADER - HEADER_SIZE) & !(MIN_ALIGN - 1);
        let end = FIRST_HEADER + HEADER_SIZE + initial_size;

        let mut state = ArenaState {
            buf: buf.into_boxed_slice(),
            end,
            free_head: 0,
        };
        state.write_prev_sentinel(FIRST_HEADER);
        state.write_header(
            FIRST_HEADER,
            BlockHeader {
                size: initial_size,
                allocated: false,
            },
        );
        state.push_head(ArenaState::payload_of(FIRST_HEADER));

        info!(
            "Arena initialized: {} bytes total, {} bytes allocatable",
            total, initial_size
        );

        Ok(Self {
            state: Arc::new(SpinLock::new(state)),
        })
    }

    /// Largest request that can succeed on a fresh arena of `total` bytes
    pub fn usable_capacity(total: usize) -> usize {
        total.saturating_sub((FIRST_HEADER + HEADER_SIZE) as usize) & !(MIN_ALIGN as usize - 1)
    }

    /// Address-order walk of the block chain (diagnostic view)
    pub fn blocks(&self) -> Vec<BlockInfo> {
        let state = self.state.lock();
        let mut out = Vec::new();
        let mut header_off = FIRST_HEADER;
        while header_off < state.end {
            let header = state.header(header_off);
            let prev = state.prev_tag(header_off);
            out.push(BlockInfo {
                offset: Offset::new(ArenaState::payload_of(header_off)),
                size: header.size as Size,
                is_free: !header.allocated,
                prev_size: prev.size as Size,
                prev_is_free: !prev.allocated,
            });
            header_off += HEADER_SIZE + header.size;
        }
        debug_assert_eq!(header_off, state.end);
        out
    }

    /// Head-to-tail walk of the free list by `next_link` (diagnostic view)
    pub fn free_list(&self) -> Vec<FreeListNode> {
        let state = self.state.lock();
        // A corrupted list could cycle; cap at the maximum block count
        // the extent can hold and complain instead of looping forever.
        let max_nodes = (state.end as usize) / ((HEADER_SIZE + MIN_ALIGN) as usize) + 1;
        let mut out = Vec::new();
        let mut payload_off = state.free_head;
        while payload_off != 0 {
            if out.len() > max_nodes {
                warn!("free list does not terminate; returning truncated walk");
                break;
            }
            let header = state.header(ArenaState::header_of(payload_off));
            let (prev_link, next_link) = state.links(payload_off);
            out.push(FreeListNode {
                offset: Offset::new(payload_off),
                size: header.size as Size,
                prev_link: Offset::new(prev_link),
                next_link: Offset::new(next_link),
            });
            payload_off = next_link;
        }
        out
    }

    /// Usage totals derived from the address-order walk
    pub fn stats(&self) -> ArenaStats {
        let state = self.state.lock();
        let mut stats = ArenaStats {
            total_bytes: state.buf.len(),
            reserved_bytes: RESERVED_HEADER as Size,
            used_bytes: 0,
            free_bytes: 0,
            allocated_blocks: 0,
            free_blocks: 0,
            largest_free_block: 0,
        };
        let mut header_off = FIRST_HEADER;
        while header_off < state.end {
            let header = state.header(header_off);
            if header.allocated {
                stats.used_bytes += header.size as Size;
                stats.allocated_blocks += 1;
            } else {
                stats.free_bytes += header.size as Size;
                stats.free_blocks += 1;
                stats.largest_free_block = stats.largest_free_block.max(header.size as Size);
            }
            header_off += HEADER_SIZE + header.size;
        }
        stats
    }

    /// Whether `offset` names a live allocation in this arena
    pub fn is_valid(&self, offset: Offset) -> bool {
        let state = self.state.lock();
        state
            .find_block(offset.get())
            .map(|(_, header)| header.allocated)
            .unwrap_or(false)
    }

    /// Payload size of the live allocation at `offset`, if any
    pub fn block_size(&self, offset: Offset) -> Option<Size> {
        let state = self.state.lock();
        state
            .find_block(offset.get())
            .filter(|(_, header)| header.allocated)
            .map(|(_, header)| header.size as Size)
    }

    pub(crate) fn lock(&self) -> crate::core::sync::SpinLockGuard<'_, ArenaState> {
        self.state.lock()
    }
}

impl ArenaState {
    /// Locate the block whose payload starts at `payload_off` by
    /// walking the chain; `None` if no block boundary matches.
    pub(crate) fn find_block(&self, payload_off: u32) -> Option<(u32, BlockHeader)> {
        if payload_off < FIRST_HEADER + HEADER_SIZE
            || payload_off >= self.end
            || payload_off % MIN_ALIGN != 0
        {
            return None;
        }
        let mut header_off = FIRST_HEADER;
        while header_off < self.end {
            let header = self.header(header_off);
            let payload = Self::payload_of(header_off);
            if payload == payload_off {
                return Some((header_off, header));
            }
            if payload > payload_off {
                return None;
            }
            header_off += HEADER_SIZE + header.size;
        }
        None
    }

    /// Largest free payload, for out-of-space diagnostics
    pub(crate) fn largest_free(&self) -> u32 {
        let mut largest = 0;
        let mut payload_off = self.free_head;
        while payload_off != 0 {
            let header = self.header(Self::header_of(payload_off));
            largest = largest.max(header.size);
            payload_off = self.links(payload_off).1;
        }
        largest
    }
}

impl Clone for Arena {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Arena").finish_non_exhaustive()
    }
}
