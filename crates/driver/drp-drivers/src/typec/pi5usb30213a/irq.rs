//! Interrupt dispatch.
//!
//! The device raises INT_N on every attach, detach and fault. The platform
//! delivers each edge to [`InterruptDispatcher::dispatch`] on its interrupt
//! thread; the dispatcher turns it into a reconcile pass. Edges that arrive
//! while a pass is already running are folded into one more pass by the
//! thread that owns the running one, so no edge is lost and at most one
//! thread reconciles at a time.
//!
//! The running flag and the pending edge share one atomic byte. Every
//! transition is a read-modify-write on that byte, so an edge recorded by a
//! late arrival is always seen by the owner when it tries to go idle.

use drp_core::sync::loom_compat::{AtomicU8, Ordering};

const IDLE: u8 = 0;
/// A pass is running.
const RECONCILING: u8 = 1 << 0;
/// An edge has arrived that no pass has consumed yet.
const PENDING: u8 = 1 << 1;

/// Dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// No reconcile pass is running.
    Idle,
    /// A reconcile pass is running.
    Reconciling,
}

/// Serializes interrupt-driven reconcile passes.
pub struct InterruptDispatcher {
    state: AtomicU8,
}

impl InterruptDispatcher {
    /// Creates an idle dispatcher.
    #[cfg(not(loom))]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
        }
    }

    /// Creates an idle dispatcher.
    #[cfg(loom)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> DispatchState {
        if self.state.load(Ordering::Acquire) & RECONCILING == 0 {
            DispatchState::Idle
        } else {
            DispatchState::Reconciling
        }
    }

    /// Returns `true` if an edge is waiting for a pass.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) & PENDING != 0
    }

    /// Handles one edge by running `reconcile` until no edge is pending.
    ///
    /// If another thread is mid-pass the edge is recorded for it and this
    /// call returns immediately.
    pub fn dispatch(&self, mut reconcile: impl FnMut()) {
        if self.state.fetch_or(PENDING, Ordering::AcqRel) & RECONCILING != 0 {
            // The running pass picks the edge up.
            return;
        }
        // Two idle arrivals race here; the loser's edge is covered by the
        // winner's pass, which starts after both were recorded.
        if self
            .state
            .compare_exchange(PENDING, RECONCILING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        loop {
            reconcile();
            if self
                .state
                .compare_exchange(RECONCILING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return;
            }
            // An edge arrived mid-pass: consume it and run again.
            self.state.fetch_and(!PENDING, Ordering::AcqRel);
        }
    }
}

impl Default for InterruptDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
