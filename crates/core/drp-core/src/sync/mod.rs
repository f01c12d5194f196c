//! Synchronization primitives.
//!
//! Provides [`SpinLock`], the lock that serializes every register-file
//! transaction of a device. Usable before any allocator or scheduler exists.
//! [`loom_compat`] lets other crates build atomics that loom can model.

mod spinlock;

pub mod loom_compat;

pub use spinlock::{SpinLock, SpinLockGuard};
