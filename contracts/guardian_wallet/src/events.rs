//! Structured event publishing for the guardian wallet.
//!
//! Indexed fields go into the topic tuple so that off-chain observers can
//! filter on them; the payload repeats them together with the ledger time.

#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ── Event payloads ───────────────────────────────────────────────────────────

/// Fired after `execute` moved value and/or called out successfully.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferExecutedEvent {
    pub target: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a guardian opens a recovery request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryInitiatedEvent {
    pub initiator: Address,
    pub proposed_owner: Address,
    pub nonce: u64,
    pub timestamp: u64,
}

/// Fired for every additional guardian approval.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryApprovedEvent {
    pub approver: Address,
    pub nonce: u64,
    pub approvals: u32,
    pub timestamp: u64,
}

/// Fired when the owner vetoes an in-flight recovery.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryCancelledEvent {
    pub owner: Address,
    pub nonce: u64,
    pub timestamp: u64,
}

/// Fired when a recovery finalises and control changes hands.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerChangedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuardianChangedEvent {
    pub guardian: Address,
    pub added: bool,
    pub timestamp: u64,
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn publish_transfer_executed(env: &Env, target: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("XFER_EXEC"), target.clone()),
        TransferExecutedEvent {
            target: target.clone(),
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_recovery_initiated(
    env: &Env,
    initiator: &Address,
    proposed_owner: &Address,
    nonce: u64,
) {
    env.events().publish(
        (
            symbol_short!("REC_INIT"),
            initiator.clone(),
            proposed_owner.clone(),
        ),
        RecoveryInitiatedEvent {
            initiator: initiator.clone(),
            proposed_owner: proposed_owner.clone(),
            nonce,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_recovery_approved(env: &Env, approver: &Address, nonce: u64, approvals: u32) {
    env.events().publish(
        (symbol_short!("REC_APPR"), approver.clone()),
        RecoveryApprovedEvent {
            approver: approver.clone(),
            nonce,
            approvals,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_recovery_cancelled(env: &Env, owner: &Address, nonce: u64) {
    env.events().publish(
        (symbol_short!("REC_CNCL"), owner.clone()),
        RecoveryCancelledEvent {
            owner: owner.clone(),
            nonce,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_changed(env: &Env, old_owner: &Address, new_owner: &Address) {
    env.events().publish(
        (
            symbol_short!("OWNER_CHG"),
            old_owner.clone(),
            new_owner.clone(),
        ),
        OwnerChangedEvent {
            old_owner: old_owner.clone(),
            new_owner: new_owner.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

/// Emit `GRD_ADD` or `GRD_REM` depending on `added`.
pub fn publish_guardian_changed(env: &Env, guardian: &Address, added: bool) {
    let topic = if added {
        symbol_short!("GRD_ADD")
    } else {
        symbol_short!("GRD_REM")
    };
    env.events().publish(
        (topic, guardian.clone()),
        GuardianChangedEvent {
            guardian: guardian.clone(),
            added,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_threshold_changed(env: &Env, threshold: u32) {
    env.events()
        .publish((symbol_short!("THRESHOLD"),), threshold);
}

pub fn publish_recovery_delay_changed(env: &Env, delay: u64) {
    env.events()
        .publish((symbol_short!("REC_DELAY"),), delay);
}
