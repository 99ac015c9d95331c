/*!
 * Shared invariant checkers for the arena tests
 */

use scratch_arena::{Arena, BlockInfo, Offset, ALIGN_UNIT, BLOCK_HEADER_SIZE};
use std::collections::BTreeSet;

/// Checks that hold for any single address-order snapshot: exact
/// extent coverage, boundary-tag agreement, no adjacent free blocks,
/// size alignment. Safe to run against a snapshot taken while other
/// threads mutate the arena, since `blocks()` walks under the guard.
pub fn check_walk(blocks: &[BlockInfo], total_bytes: usize) {
    assert!(!blocks.is_empty(), "arena must contain at least one block");

    let extent = Arena::usable_capacity(total_bytes) + BLOCK_HEADER_SIZE;
    let covered: usize = blocks.iter().map(|b| b.size + BLOCK_HEADER_SIZE).sum();
    assert_eq!(covered, extent, "block chain must cover the extent exactly");

    for (i, block) in blocks.iter().enumerate() {
        assert!(
            block.size % ALIGN_UNIT == 0 && block.size >= ALIGN_UNIT,
            "misaligned size {} at {}",
            block.size,
            block.offset
        );
        if i == 0 {
            assert_eq!(block.prev_size, 0, "first block tag size");
            assert!(
                !block.prev_is_free,
                "first block must carry the used sentinel tag"
            );
        } else {
            let prev = &blocks[i - 1];
            assert_eq!(
                block.offset.get(),
                prev.offset.get() + (prev.size + BLOCK_HEADER_SIZE) as u32,
                "gap or overlap before {}",
                block.offset
            );
            assert_eq!(
                block.prev_size, prev.size,
                "boundary tag size mismatch at {}",
                block.offset
            );
            assert_eq!(
                block.prev_is_free, prev.is_free,
                "boundary tag flag mismatch at {}",
                block.offset
            );
            assert!(
                !(block.is_free && prev.is_free),
                "adjacent free blocks at {}",
                block.offset
            );
        }
    }
}

/// Full cross-view verification: both diagnostic walks agree and every
/// live offset names a distinct allocated block. Only meaningful while
/// no other thread mutates the arena, because the two walks take the
/// guard separately.
pub fn check_invariants(arena: &Arena, live: &[Offset]) {
    let blocks = arena.blocks();
    let stats = arena.stats();
    check_walk(&blocks, stats.total_bytes);

    let nodes = arena.free_list();
    let from_walk: BTreeSet<Offset> = blocks
        .iter()
        .filter(|b| b.is_free)
        .map(|b| b.offset)
        .collect();
    let from_list: BTreeSet<Offset> = nodes.iter().map(|n| n.offset).collect();
    assert_eq!(from_list, from_walk, "free list and address walk disagree");
    assert_eq!(nodes.len(), from_walk.len(), "free list revisits a block");

    for (i, node) in nodes.iter().enumerate() {
        if i == 0 {
            assert!(node.prev_link.is_none(), "head must have no prev link");
        } else {
            assert_eq!(node.prev_link, nodes[i - 1].offset, "broken prev link");
            assert_eq!(nodes[i - 1].next_link, node.offset, "broken next link");
        }
    }
    if let Some(last) = nodes.last() {
        assert!(last.next_link.is_none(), "tail must end the list");
    }

    let allocated: BTreeSet<Offset> = blocks
        .iter()
        .filter(|b| !b.is_free)
        .map(|b| b.offset)
        .collect();
    let mut seen = BTreeSet::new();
    for off in live {
        assert!(allocated.contains(off), "live offset {} is not allocated", off);
        assert!(seen.insert(*off), "duplicate live offset {}", off);
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
