//! Core logging and synchronization primitives for the DRP driver stack.
//!
//! Everything here is `no_std` and allocation-free so it can run inside the
//! platform's interrupt threads. Host builds (`cargo test`, loom) get `std`
//! so the primitives can be exercised from real threads.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod log;
pub mod sync;
