/*!
 * Busy-Wait Spin Lock
 *
 * Serializes allocator operations against a single arena. Contention
 * is resolved by spinning with periodic scheduler yields; the lock
 * never parks the calling thread.
 *
 * # Limitations
 *
 * No reentrancy, no priority inheritance, no fairness. A holder that
 * never returns starves every other caller; callers are expected to
 * hold the lock only for the short alloc/free/introspection bodies.
 */

use std::cell::UnsafeCell;
use std::hint;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Spin lock protecting one value
pub struct SpinLock<T> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

// Safety: the lock grants exclusive access to `value`, so sharing the
// lock across threads is sound whenever the value itself can be sent.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    pub const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Acquire the lock, spinning until it is available
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        let mut spin_count: u32 = 0;
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                hint::spin_loop();
                spin_count = spin_count.wrapping_add(1);
                // Yield to scheduler occasionally
                if spin_count % 64 == 0 {
                    thread::yield_now();
                }
            }
        }
        SpinLockGuard { lock: self }
    }

    /// Try to acquire the lock without spinning
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinLockGuard { lock: self })
    }

    /// Get mutable access without locking (requires exclusive borrow)
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SpinLock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.try_lock() {
            Some(guard) => f.debug_struct("SpinLock").field("value", &*guard).finish(),
            None => f.debug_struct("SpinLock").field("value", &"<locked>").finish(),
        }
    }
}

/// RAII guard: the lock is released on drop, covering every exit path
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: holding the guard means holding the lock
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: holding the guard means holding the lock
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
