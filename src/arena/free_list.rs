/*!
 * Free List
 * Explicit doubly-linked list threading all free blocks
 *
 * A free block reuses its first two payload words as `prev_link` and
 * `next_link` (payload-start offsets, zero meaning "none"), so the
 * list costs no storage of its own. The list head lives in the arena
 * state; insertion is at the head, so order is most-recently-freed
 * first and unrelated to address or size order.
 */

use super::ArenaState;

impl ArenaState {
    /// `(prev_link, next_link)` of the free block at `payload_off`
    pub(crate) fn links(&self, payload_off: u32) -> (u32, u32) {
        let off = payload_off as usize;
        let prev = u32::from_le_bytes(self.buf[off..off + 4].try_into().unwrap());
        let next = u32::from_le_bytes(self.buf[off + 4..off + 8].try_into().unwrap());
        (prev, next)
    }

    pub(crate) fn set_links(&mut self, payload_off: u32, prev: u32, next: u32) {
        let off = payload_off as usize;
        self.buf[off..off + 4].copy_from_slice(&prev.to_le_bytes());
        self.buf[off + 4..off + 8].copy_from_slice(&next.to_le_bytes());
    }

    fn set_prev_link(&mut self, payload_off: u32, prev: u32) {
        let off = payload_off as usize;
        self.buf[off..off + 4].copy_from_slice(&prev.to_le_bytes());
    }

    fn set_next_link(&mut self, payload_off: u32, next: u32) {
        let off = payload_off as usize;
        self.buf[off + 4..off + 8].copy_from_slice(&next.to_le_bytes());
    }

    /// Insert a newly freed block at the list head
    pub(crate) fn push_head(&mut self, payload_off: u32) {
        let old_head = self.free_head;
        self.set_links(payload_off, 0, old_head);
        if old_head != 0 {
            self.set_prev_link(old_head, payload_off);
        }
        self.free_head = payload_off;
    }

    /// Splice a free block out of the list using its own links
    pub(crate) fn unlink(&mut self, payload_off: u32) {
        let (prev, next) = self.links(payload_off);
        if prev != 0 {
            self.set_next_link(prev, next);
        } else {
            debug_assert_eq!(self.free_head, payload_off);
            self.free_head = next;
        }
        if next != 0 {
            self.set_prev_link(next, prev);
        }
    }

    /// Replace `old` with `new` in place: `new` inherits `old`'s
    /// neighbors. Used when a split leaves a remainder free block.
    pub(crate) fn splice_replace(&mut self, old: u32, new: u32) {
        let (prev, next) = self.links(old);
        self.set_links(new, prev, next);
        if prev != 0 {
            self.set_next_link(prev, new);
        } else {
            debug_assert_eq!(self.free_head, old);
            self.free_head = new;
        }
        if next != 0 {
            self.set_prev_link(next, new);
        }
    }
}
