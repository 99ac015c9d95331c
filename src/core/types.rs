/*!
 * Core Types
 * Common types used across the crate
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size type for allocation requests
pub type Size = usize;

/// Arena-relative byte index of a block payload.
///
/// Offsets are indices into one arena's buffer, never native pointers,
/// so the arena stays position-independent and bounds checking is
/// explicit. `Offset::NONE` (zero) means "no block"; no payload ever
/// starts at zero because the arena begins with a reserved header.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Offset(u32);

impl Offset {
    /// The "no block" sentinel
    pub const NONE: Offset = Offset(0);

    pub const fn new(raw: u32) -> Self {
        Offset(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}
