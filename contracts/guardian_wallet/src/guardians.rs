//! Guardian set storage and validation.
//!
//! The set is kept as an insertion-ordered `Vec<Address>` in instance
//! storage; its length is the guardian count. The owner is never a member.

use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

const GUARDIANS: Symbol = symbol_short!("GUARDIANS");

pub(crate) fn load(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&GUARDIANS)
        .unwrap_or_else(|| Vec::new(env))
}

fn store(env: &Env, guardians: &Vec<Address>) {
    env.storage().instance().set(&GUARDIANS, guardians);
}

pub(crate) fn contains(env: &Env, candidate: &Address) -> bool {
    load(env).contains(candidate)
}

pub(crate) fn count(env: &Env) -> u32 {
    load(env).len()
}

/// Check a threshold against a guardian count: `1 <= threshold <= count`.
pub(crate) fn check_threshold(threshold: u32, count: u32) -> Result<(), ContractError> {
    if threshold == 0 || threshold > count {
        return Err(ContractError::InvalidThreshold);
    }
    Ok(())
}

/// Validate and store the guardian list supplied at initialisation.
pub(crate) fn init(
    env: &Env,
    owner: &Address,
    guardians: &Vec<Address>,
    threshold: u32,
) -> Result<(), ContractError> {
    let mut seen: Vec<Address> = Vec::new(env);
    for guardian in guardians.iter() {
        if guardian == *owner {
            return Err(ContractError::OwnerCannotBeGuardian);
        }
        if seen.contains(&guardian) {
            return Err(ContractError::DuplicateGuardian);
        }
        seen.push_back(guardian);
    }
    check_threshold(threshold, seen.len())?;

    store(env, &seen);
    Ok(())
}

pub(crate) fn add(env: &Env, owner: &Address, guardian: Address) -> Result<(), ContractError> {
    if guardian == *owner {
        return Err(ContractError::OwnerCannotBeGuardian);
    }

    let mut guardians = load(env);
    if guardians.contains(&guardian) {
        return Err(ContractError::DuplicateGuardian);
    }

    guardians.push_back(guardian);
    store(env, &guardians);
    Ok(())
}

/// Remove `guardian`, refusing to leave fewer guardians than `threshold`.
pub(crate) fn remove(env: &Env, guardian: &Address, threshold: u32) -> Result<(), ContractError> {
    let guardians = load(env);
    if !guardians.contains(guardian) {
        return Err(ContractError::GuardianNotFound);
    }
    if guardians.len() - 1 < threshold {
        return Err(ContractError::ThresholdUnreachable);
    }

    let mut remaining = Vec::new(env);
    for g in guardians.iter() {
        if g != *guardian {
            remaining.push_back(g);
        }
    }
    store(env, &remaining);
    Ok(())
}
