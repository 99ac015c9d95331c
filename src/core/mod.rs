/*!
 * Core Module
 * Fundamental types and synchronization primitives
 */

pub mod sync;
pub mod types;

// Re-export for convenience
pub use sync::{SpinLock, SpinLockGuard};
pub use types::*;
