//! Busy-waiting lock for driver state shared between threads.
//!
//! Driver paths that hold a [`SpinLock`] do short, bounded work (a register
//! transfer and a settle delay), so waiters spin instead of sleeping.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use super::loom_compat::{AtomicBool, Ordering, spin_loop};

/// A lock that spins until the holder releases it.
///
/// Waiters poll with plain loads and only retry the atomic exchange once
/// the lock looks free, which keeps the flag's cache line shared while the
/// holder works.
pub struct SpinLock<T> {
    held: AtomicBool,
    value: UnsafeCell<T>,
}

// SAFETY: Access to `value` is only handed out through a guard, and at most
// one guard exists at a time. Moving the lock moves `T`, hence `T: Send`.
unsafe impl<T: Send> Send for SpinLock<T> {}
// SAFETY: As above; sharing the lock lets any thread obtain `&mut T` in turn.
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Wraps `value` in an unlocked lock.
    #[cfg(not(loom))]
    pub const fn new(value: T) -> Self {
        Self {
            held: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Wraps `value` in an unlocked lock.
    #[cfg(loom)]
    pub fn new(value: T) -> Self {
        Self {
            held: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    /// Blocks until the lock is acquired.
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        loop {
            if let Some(guard) = self.acquire(true) {
                return guard;
            }
            while self.held.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
    }

    /// Acquires the lock if nobody holds it.
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        self.acquire(false)
    }

    /// Unwraps the protected value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    fn acquire(&self, weak: bool) -> Option<SpinLockGuard<'_, T>> {
        let result = if weak {
            self.held
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
        } else {
            self.held
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
        };
        result.ok().map(|_| SpinLockGuard { lock: self })
    }
}

/// Exclusive access to a [`SpinLock`]'s value; unlocks on drop.
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: This guard is the only one in existence.
        unsafe { &*self.lock.value.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: This guard is the only one in existence.
        unsafe { &mut *self.lock.value.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.held.store(false, Ordering::Release);
    }
}
