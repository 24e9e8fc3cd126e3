#![no_std]

//! # Number Registry
//!
//! A phonebook binding phone numbers to wallet addresses through a
//! two-phase commit-reveal protocol run by a single registering authority:
//!
//! 1. `commit(fingerprint)` records an opaque SHA-256 fingerprint of
//!    `(phone_number, wallet, salt)` with the current ledger time.
//! 2. `reveal(phone_number, wallet, salt)` recomputes the fingerprint and,
//!    inside the reveal window, consumes the commitment and writes the
//!    binding.
//!
//! Nothing about the binding is visible until the reveal, and a reveal only
//! matches the exact commitment made for it, so observing one gives an
//! attacker nothing to front-run with. Each commitment is single-use.

pub mod commitment;
pub mod directory;
pub mod events;


use common::{SECS_PER_DAY, SECS_PER_MINUTE};
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Bytes, BytesN, Env, Symbol,
};

// ── Storage keys ─────────────────────────────────────────────────────────────

const AUTHORITY: Symbol = symbol_short!("AUTHORITY");
const INITIALIZED: Symbol = symbol_short!("INIT");

/// A commitment cannot be revealed during its first minute.
pub const MIN_REVEAL_DELAY: u64 = SECS_PER_MINUTE;
/// A commitment cannot be revealed more than 24 hours after it was made.
pub const MAX_REVEAL_WINDOW: u64 = SECS_PER_DAY;

// ── Error codes ───────────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RegistryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidPhoneNumber = 4,
    CommitmentNotFound = 5,
    RevealTooEarly = 6,
    RevealWindowExpired = 7,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct NumberRegistryContract;

#[contractimpl]
impl NumberRegistryContract {
    /// Bootstrap the registry with its (immutable) registering authority.
    pub fn initialize(env: Env, authority: Address) -> Result<(), RegistryError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(RegistryError::AlreadyInitialized);
        }
        authority.require_auth();

        env.storage().instance().set(&AUTHORITY, &authority);
        env.storage().instance().set(&INITIALIZED, &true);
        common::extend_instance(&env);

        Ok(())
    }

    /// Record `fingerprint` as pending at the current ledger time.
    ///
    /// Committing a fingerprint that is already pending (or expired) just
    /// refreshes its timestamp.
    pub fn commit(env: Env, caller: Address, fingerprint: BytesN<32>) -> Result<(), RegistryError> {
        caller.require_auth();
        Self::require_authority(&env, &caller)?;

        commitment::store(&env, &fingerprint, env.ledger().timestamp());
        common::extend_instance(&env);

        events::publish_committed(&env, &fingerprint);
        Ok(())
    }

    /// Consume the commitment for `(phone_number, wallet, salt)` and bind
    /// `phone_number` to `wallet`.
    ///
    /// Accepted when `committed_at + MIN_REVEAL_DELAY <= now <=
    /// committed_at + MAX_REVEAL_WINDOW`. A reveal that fails the window
    /// leaves the commitment in place. Returns the wallet previously bound to
    /// the number, if any.
    pub fn reveal(
        env: Env,
        caller: Address,
        phone_number: u64,
        wallet: Address,
        salt: Bytes,
    ) -> Result<Option<Address>, RegistryError> {
        caller.require_auth();
        Self::require_authority(&env, &caller)?;

        if phone_number == 0 {
            return Err(RegistryError::InvalidPhoneNumber);
        }

        let fingerprint = commitment::fingerprint(&env, phone_number, &wallet, &salt);
        let committed_at = commitment::committed_at(&env, &fingerprint)
            .ok_or(RegistryError::CommitmentNotFound)?;

        let now = env.ledger().timestamp();
        if now < committed_at.saturating_add(MIN_REVEAL_DELAY) {
            return Err(RegistryError::RevealTooEarly);
        }
        if now > committed_at.saturating_add(MAX_REVEAL_WINDOW) {
            return Err(RegistryError::RevealWindowExpired);
        }

        commitment::remove(&env, &fingerprint);
        let previous = directory::bind(&env, phone_number, &wallet);

        match &previous {
            None => events::publish_registered(&env, phone_number, &wallet),
            Some(old_wallet) => {
                events::publish_wallet_updated(&env, phone_number, old_wallet, &wallet)
            }
        }
        Ok(previous)
    }

    // ── Views ────────────────────────────────────────────────────────────────

    /// The fingerprint `reveal` will look for; clients commit this value.
    pub fn compute_fingerprint(
        env: Env,
        phone_number: u64,
        wallet: Address,
        salt: Bytes,
    ) -> BytesN<32> {
        commitment::fingerprint(&env, phone_number, &wallet, &salt)
    }

    pub fn get_authority(env: Env) -> Result<Address, RegistryError> {
        Self::load_authority(&env)
    }

    pub fn has_commitment(env: Env, fingerprint: BytesN<32>) -> bool {
        commitment::committed_at(&env, &fingerprint).is_some()
    }

    pub fn commitment_time(env: Env, fingerprint: BytesN<32>) -> Option<u64> {
        commitment::committed_at(&env, &fingerprint)
    }

    pub fn get_wallet(env: Env, phone_number: u64) -> Option<Address> {
        directory::lookup(&env, phone_number)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_authority(env: &Env) -> Result<Address, RegistryError> {
        env.storage()
            .instance()
            .get(&AUTHORITY)
            .ok_or(RegistryError::NotInitialized)
    }

    fn require_authority(env: &Env, caller: &Address) -> Result<(), RegistryError> {
        if Self::load_authority(env)? != *caller {
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }
}
