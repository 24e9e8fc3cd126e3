//! Recovery request lifecycle and nonce-scoped vote bookkeeping.
//!
//! ```text
//! Idle ──initiate──▶ Active(approvals < threshold)
//!                     │ approve
//!                     ▼
//!                    Active(approvals >= threshold, now < initiated_at + delay)
//!                     │ time passes
//!                     ▼
//!                    Active(executable) ──execute──▶ Idle
//! Active(any) ──cancel──▶ Idle
//! ```
//!
//! Votes are recorded under `(VOTE, nonce, guardian)`. Every new request
//! takes a fresh nonce, so a vote cast for an earlier request is never
//! looked at again and nothing has to be cleared when a request ends.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

const RECOVERY: Symbol = symbol_short!("RECOVERY");
const NONCE: Symbol = symbol_short!("REC_NONCE");
const VOTE: Symbol = symbol_short!("VOTE");

// ── Types ─────────────────────────────────────────────────────────────────────

/// An in-flight request to hand control to `proposed_owner`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryRequest {
    pub proposed_owner: Address,
    /// Includes the initiator's implicit vote.
    pub approvals: u32,
    pub initiated_at: u64,
    pub nonce: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecoveryState {
    Idle,
    Active(RecoveryRequest),
}

/// Where the current request stands, as seen at a given ledger time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecoveryStatus {
    Idle,
    AwaitingApprovals,
    AwaitingTimelock,
    Executable,
}

impl RecoveryRequest {
    /// Earliest ledger time at which the request may be executed.
    pub fn unlocks_at(&self, delay: u64) -> u64 {
        self.initiated_at.saturating_add(delay)
    }

    pub fn status(&self, threshold: u32, delay: u64, now: u64) -> RecoveryStatus {
        if self.approvals < threshold {
            RecoveryStatus::AwaitingApprovals
        } else if now < self.unlocks_at(delay) {
            RecoveryStatus::AwaitingTimelock
        } else {
            RecoveryStatus::Executable
        }
    }
}

impl RecoveryState {
    pub fn is_active(&self) -> bool {
        matches!(self, RecoveryState::Active(_))
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

pub(crate) fn load(env: &Env) -> RecoveryState {
    env.storage()
        .instance()
        .get(&RECOVERY)
        .unwrap_or(RecoveryState::Idle)
}

/// Load the active request or fail with `NoActiveRecovery`.
pub(crate) fn load_active(env: &Env) -> Result<RecoveryRequest, ContractError> {
    match load(env) {
        RecoveryState::Active(request) => Ok(request),
        RecoveryState::Idle => Err(ContractError::NoActiveRecovery),
    }
}

pub(crate) fn store_active(env: &Env, request: &RecoveryRequest) {
    env.storage()
        .instance()
        .set(&RECOVERY, &RecoveryState::Active(request.clone()));
}

/// Drop the request entirely; an absent entry reads back as `Idle`.
pub(crate) fn clear(env: &Env) {
    env.storage().instance().remove(&RECOVERY);
}

pub(crate) fn current_nonce(env: &Env) -> u64 {
    env.storage().instance().get(&NONCE).unwrap_or(0)
}

/// Bump and persist the nonce, returning the new value.
pub(crate) fn advance_nonce(env: &Env) -> Result<u64, ContractError> {
    let next = current_nonce(env)
        .checked_add(1)
        .ok_or(ContractError::NonceOverflow)?;
    env.storage().instance().set(&NONCE, &next);
    Ok(next)
}

fn vote_key(nonce: u64, guardian: &Address) -> (Symbol, u64, Address) {
    (VOTE, nonce, guardian.clone())
}

pub(crate) fn record_vote(env: &Env, nonce: u64, guardian: &Address) {
    let key = vote_key(nonce, guardian);
    env.storage().persistent().set(&key, &true);
    common::extend_persistent(env, &key);
}

pub(crate) fn has_voted(env: &Env, nonce: u64, guardian: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&vote_key(nonce, guardian))
}
