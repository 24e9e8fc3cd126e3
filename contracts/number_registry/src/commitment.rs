//! Commitment fingerprints and the pending-commitment table.
//!
//! ## Fingerprint encoding
//! ```text
//! fingerprint = SHA-256( phone_number as u64 big-endian (8 bytes)
//!                     || wallet as Address XDR
//!                     || salt bytes )
//! ```
//! Phone number and wallet are fixed width, so the salt needs no length
//! prefix. Commit and reveal both go through [`fingerprint`].

use soroban_sdk::{symbol_short, xdr::ToXdr, Address, Bytes, BytesN, Env, Symbol};

const COMMIT: Symbol = symbol_short!("COMMIT");

pub fn fingerprint(env: &Env, phone_number: u64, wallet: &Address, salt: &Bytes) -> BytesN<32> {
    let mut data = Bytes::new(env);
    data.extend_from_array(&phone_number.to_be_bytes());
    data.append(&wallet.clone().to_xdr(env));
    data.append(salt);
    env.crypto().sha256(&data).into()
}

fn commit_key(fingerprint: &BytesN<32>) -> (Symbol, BytesN<32>) {
    (COMMIT, fingerprint.clone())
}

/// Record (or refresh) a pending commitment made at `now`.
pub(crate) fn store(env: &Env, fingerprint: &BytesN<32>, now: u64) {
    let key = commit_key(fingerprint);
    env.storage().persistent().set(&key, &now);
    common::extend_persistent(env, &key);
}

/// Ledger time at which `fingerprint` was committed, if it is pending.
pub(crate) fn committed_at(env: &Env, fingerprint: &BytesN<32>) -> Option<u64> {
    env.storage().persistent().get(&commit_key(fingerprint))
}

pub(crate) fn remove(env: &Env, fingerprint: &BytesN<32>) {
    env.storage().persistent().remove(&commit_key(fingerprint));
}
