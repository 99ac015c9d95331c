/*!
 * Allocator
 * Best-fit allocation and boundary-tag coalescing over one arena
 */

use super::block::{align_up, BlockHeader, FIRST_HEADER, HEADER_SIZE};
use super::types::{ArenaError, ArenaResult};
use super::{Arena, ArenaState};
use crate::core::types::{Offset, Size};
use log::{debug, warn};

impl Arena {
    /// Allocate a block of at least `size` bytes.
    ///
    /// A zero request is treated as size 1 so the block always retains
    /// room for the free-list links once freed. The request rounds up
    /// to the alignment unit before the search. Returns the
    /// payload-start offset of the new block; on failure the arena is
    /// untouched.
    pub fn allocate(&self, size: Size) -> ArenaResult<Offset> {
        let mut state = self.lock();

        let request = size.max(1);
        let want = u32::try_from(request)
            .ok()
            .and_then(align_up)
            .ok_or_else(|| {
                warn!("allocation of {} bytes exceeds the offset range", size);
                ArenaError::OutOfSpace {
                    requested: size,
                    largest_free: state.largest_free() as Size,
                }
            })?;

        // Best fit over the free list, head to tail. A later candidate
        // of equal size replaces an earlier one; the exact tie-break
        // order is part of the contract.
        let mut best: Option<u32> = None;
        let mut best_size = u32::MAX;
        let mut payload_off = state.free_head;
        while payload_off != 0 {
            let header = state.header(ArenaState::header_of(payload_off));
            if header.size >= want && header.size <= best_size {
                best = Some(payload_off);
                best_size = header.size;
            }
            payload_off = state.links(payload_off).1;
        }

        let Some(payload) = best else {
            let largest_free = state.largest_free() as Size;
            debug!(
                "out of space: requested {} bytes, largest free block {}",
                size, largest_free
            );
            return Err(ArenaError::OutOfSpace {
                requested: size,
                largest_free,
            });
        };
        let header_off = ArenaState::header_of(payload);

        if best_size > want + HEADER_SIZE {
            // Split: the low `want` bytes become the allocation and the
            // remainder becomes a free block inheriting the chosen
            // block's list neighbors. Sizes are aligned, so the
            // remainder payload is always at least one link pair.
            let rem_header = header_off + HEADER_SIZE + want;
            let rem_size = best_size - want - HEADER_SIZE;
            state.write_header(
                rem_header,
                BlockHeader {
                    size: rem_size,
                    allocated: false,
                },
            );
            state.splice_replace(payload, ArenaState::payload_of(rem_header));

            let allocated = BlockHeader {
                size: want,
                allocated: true,
            };
            state.write_header(header_off, allocated);
            state.write_prev_tag(rem_header, allocated);

            // The block after the remainder now follows a smaller free
            // predecessor; refresh its boundary tag.
            if let Some(succ) = state.next_header(rem_header) {
                state.write_prev_tag(
                    succ,
                    BlockHeader {
                        size: rem_size,
                        allocated: false,
                    },
                );
            }
        } else {
            // Remainder too small to host a header plus a minimum free
            // payload: hand the caller the whole block.
            state.unlink(payload);
            let allocated = BlockHeader {
                size: best_size,
                allocated: true,
            };
            state.write_header(header_off, allocated);
            if let Some(succ) = state.next_header(header_off) {
                state.write_prev_tag(succ, allocated);
            }
        }

        debug!("allocated {} bytes at 0x{:04x}", size, payload);
        Ok(Offset::new(payload))
    }

    /// Release the block at `offset`, coalescing with any free
    /// neighbor immediately.
    ///
    /// `Offset::NONE` is a documented no-op. Offsets that do not name
    /// a block payload report [`ArenaError::InvalidOffset`]; freeing
    /// an already-free block reports [`ArenaError::DoubleFree`].
    /// Neither failure mutates the arena.
    pub fn free(&self, offset: Offset) -> ArenaResult<()> {
        if offset.is_none() {
            return Ok(());
        }
        let mut state = self.lock();

        let Some((header_off, header)) = state.find_block(offset.get()) else {
            warn!("attempted to free invalid offset {}", offset);
            return Err(ArenaError::InvalidOffset(offset));
        };
        if !header.allocated {
            warn!("attempted to free already-free block at {}", offset);
            return Err(ArenaError::DoubleFree(offset));
        }

        let mut size = header.size;
        let mut current = header_off;
        state.write_header(
            current,
            BlockHeader {
                size,
                allocated: false,
            },
        );

        // Backward merge via the boundary tag. The first block's tag
        // is the "used" sentinel, so this never walks before the
        // arena start.
        let prev = state.prev_tag(current);
        if current > FIRST_HEADER && !prev.allocated {
            let pred = current - HEADER_SIZE - prev.size;
            size = prev.size + HEADER_SIZE + size;
            current = pred;
            state.write_header(
                current,
                BlockHeader {
                    size,
                    allocated: false,
                },
            );
            // The predecessor was already linked; no list surgery.
        } else {
            state.push_head(ArenaState::payload_of(current));
        }

        // Forward merge: refresh the successor's tag, then absorb it
        // if it is free and propagate the tag one block further.
        if let Some(succ) = state.next_header(current) {
            let freed = BlockHeader {
                size,
                allocated: false,
            };
            state.write_prev_tag(succ, freed);

            let succ_header = state.header(succ);
            if !succ_header.allocated {
                state.unlink(ArenaState::payload_of(succ));
                size += HEADER_SIZE + succ_header.size;
                let merged = BlockHeader {
                    size,
                    allocated: false,
                };
                state.write_header(current, merged);
                if let Some(after) = state.next_header(current) {
                    state.write_prev_tag(after, merged);
                }
            }
        }

        debug!("freed block at {}", offset);
        Ok(())
    }
}

impl super::traits::ScratchAlloc for Arena {
    fn allocate(&self, size: Size) -> ArenaResult<Offset> {
        Arena::allocate(self, size)
    }

    fn free(&self, offset: Offset) -> ArenaResult<()> {
        Arena::free(self, offset)
    }

    fn is_valid(&self, offset: Offset) -> bool {
        Arena::is_valid(self, offset)
    }

    fn block_size(&self, offset: Offset) -> Option<Size> {
        Arena::block_size(self, offset)
    }
}
