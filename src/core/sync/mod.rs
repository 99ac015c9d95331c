/*!
 * Synchronization Primitives
 *
 * Busy-wait mutual exclusion for short, non-suspending critical
 * sections. The arena's alloc/free bodies never block on anything but
 * this lock, so spinning beats parking here.
 */

mod spinlock;

pub use spinlock::{SpinLock, SpinLockGuard};
