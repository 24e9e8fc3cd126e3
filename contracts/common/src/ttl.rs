//! Ledger-entry TTL management.
//!
//! Every write to instance or persistent storage should be followed by an
//! extension so that live state is never archived between interactions.

use soroban_sdk::{Env, IntoVal, Val};

/// Extend when the remaining TTL drops below ~30 days.
pub const TTL_THRESHOLD: u32 = 518_400;
/// Extend up to ~60 days.
pub const TTL_EXTEND_TO: u32 = 1_036_800;

/// Extend the contract instance (and every instance-storage entry).
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extend a single persistent entry. The key must exist.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
