//! Loom compatibility shim.
//!
//! When compiled with `cfg(loom)`, re-exports loom's atomics and spin hint so
//! [`SpinLock`](super::SpinLock) and the lock-free driver state built on these
//! atomics can be model-checked under loom's deterministic scheduler.
//! Otherwise, re-exports the `core` equivalents.

#[cfg(loom)]
pub use loom::hint::spin_loop;
#[cfg(loom)]
pub use loom::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(not(loom))]
pub use core::hint::spin_loop;
#[cfg(not(loom))]
pub use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
