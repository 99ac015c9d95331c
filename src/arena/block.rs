/*!
 * Block Layout
 * Boundary-tag header codec over the arena buffer
 *
 * Every block is `HEADER_SIZE` bytes of bookkeeping followed by its
 * payload. The header holds the predecessor's raw size field (boundary
 * tag) and the block's own raw size field; the low bit of a raw field
 * is the allocated flag. Masking is confined to this module — the rest
 * of the crate works with the decoded `BlockHeader`.
 */

use super::ArenaState;

/// Bytes of bookkeeping per block: `prev_size: u32` then `size: u32`
pub(crate) const HEADER_SIZE: u32 = 8;

/// Payload sizes round up to two link words so any block can carry the
/// free-list link pair once freed
pub(crate) const MIN_ALIGN: u32 = 8;

/// Opaque region at the arena start, owned by the embedding context
pub(crate) const RESERVED_HEADER: u32 = 96;

/// Offset of the first block header, right after the reserved region
pub(crate) const FIRST_HEADER: u32 = RESERVED_HEADER;

/// Boundary tag installed as the first block's `prev_size`: size 0,
/// allocated. Coalescing never walks past it.
pub(crate) const PREV_SENTINEL: u32 = 1;

const FLAG_ALLOCATED: u32 = 1;

/// Decoded block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockHeader {
    /// Payload size in bytes, always a multiple of `MIN_ALIGN`
    pub size: u32,
    pub allocated: bool,
}

impl BlockHeader {
    pub fn decode(raw: u32) -> Self {
        Self {
            size: raw & !FLAG_ALLOCATED,
            allocated: raw & FLAG_ALLOCATED != 0,
        }
    }

    pub fn encode(self) -> u32 {
        debug_assert_eq!(self.size & FLAG_ALLOCATED, 0);
        self.size | u32::from(self.allocated)
    }
}

/// Round a request up to `MIN_ALIGN`; `None` on `u32` overflow
pub(crate) fn align_up(size: u32) -> Option<u32> {
    size.checked_add(MIN_ALIGN - 1).map(|s| s & !(MIN_ALIGN - 1))
}

impl ArenaState {
    fn read_u32(&self, off: u32) -> u32 {
        let off = off as usize;
        u32::from_le_bytes(self.buf[off..off + 4].try_into().unwrap())
    }

    fn write_u32(&mut self, off: u32, value: u32) {
        let off = off as usize;
        self.buf[off..off + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Decode the header of the block starting at `header_off`
    pub(crate) fn header(&self, header_off: u32) -> BlockHeader {
        BlockHeader::decode(self.read_u32(header_off + 4))
    }

    pub(crate) fn write_header(&mut self, header_off: u32, header: BlockHeader) {
        let raw = header.encode();
        self.write_u32(header_off + 4, raw);
    }

    /// Boundary tag mirroring the preceding block's size field
    pub(crate) fn prev_tag(&self, header_off: u32) -> BlockHeader {
        BlockHeader::decode(self.read_u32(header_off))
    }

    pub(crate) fn write_prev_tag(&mut self, header_off: u32, tag: BlockHeader) {
        self.write_u32(header_off, tag.encode());
    }

    pub(crate) fn write_prev_sentinel(&mut self, header_off: u32) {
        self.write_u32(header_off, PREV_SENTINEL);
    }

    /// Header offset of the next block by address, `None` at arena end
    pub(crate) fn next_header(&self, header_off: u32) -> Option<u32> {
        let next = header_off + HEADER_SIZE + self.header(header_off).size;
        debug_assert!(next <= self.end);
        (next < self.end).then_some(next)
    }

    pub(crate) fn payload_of(header_off: u32) -> u32 {
        header_off + HEADER_SIZE
    }

    pub(crate) fn header_of(payload_off: u32) -> u32 {
        payload_off - HEADER_SIZE
    }
}
