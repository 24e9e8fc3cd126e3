//! Shared utilities for the Sentinel contract suite.
//!
//! This crate provides:
//! - [`reentrancy_guard`] — a scoped, storage-backed non-reentrancy flag.
//! - [`ttl`] — ledger-entry TTL extension with suite-wide constants.
//! - Time constants expressed in ledger seconds.

#![no_std]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod reentrancy_guard;
pub mod ttl;

pub use reentrancy_guard::*;
pub use ttl::*;

// ── Time ─────────────────────────────────────────────────────────────────────

/// Seconds in one minute.
pub const SECS_PER_MINUTE: u64 = 60;
/// Seconds in one hour.
pub const SECS_PER_HOUR: u64 = 3_600;
/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 86_400;
