//! Structured event publishing for the number registry.
//!
//! `Committed` carries only the opaque fingerprint; plaintext phone numbers
//! and wallets appear on the event stream only once revealed.

#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

// ── Event payloads ───────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommittedEvent {
    pub fingerprint: BytesN<32>,
    pub timestamp: u64,
}

/// Fired on the first binding of a phone number.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegisteredEvent {
    pub phone_number: u64,
    pub wallet: Address,
    pub timestamp: u64,
}

/// Fired when an already-bound phone number is re-bound.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WalletUpdatedEvent {
    pub phone_number: u64,
    pub old_wallet: Address,
    pub new_wallet: Address,
    pub timestamp: u64,
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn publish_committed(env: &Env, fingerprint: &BytesN<32>) {
    env.events().publish(
        (symbol_short!("COMMITTED"), fingerprint.clone()),
        CommittedEvent {
            fingerprint: fingerprint.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_registered(env: &Env, phone_number: u64, wallet: &Address) {
    env.events().publish(
        (symbol_short!("REGISTER"), phone_number, wallet.clone()),
        RegisteredEvent {
            phone_number,
            wallet: wallet.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_wallet_updated(
    env: &Env,
    phone_number: u64,
    old_wallet: &Address,
    new_wallet: &Address,
) {
    env.events().publish(
        (
            symbol_short!("WALLETUPD"),
            phone_number,
            old_wallet.clone(),
            new_wallet.clone(),
        ),
        WalletUpdatedEvent {
            phone_number,
            old_wallet: old_wallet.clone(),
            new_wallet: new_wallet.clone(),
            timestamp: env.ledger().timestamp(),
        },
    );
}
