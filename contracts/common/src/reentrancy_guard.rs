//! Storage-backed non-reentrancy flag.
//!
//! The flag lives in instance storage so that it is visible to every frame
//! of the same contract. Contract code should go through [`guarded`]: the
//! flag is raised before the closure runs and lowered after it returns, on
//! the `Ok` and the `Err` path alike. A trap inside the closure aborts the whole
//! invocation, which rolls the flag back together with every other write.

use soroban_sdk::{symbol_short, Env, Symbol};

const ENTERED: Symbol = symbol_short!("REENTRANT");

/// Returns `true` while a guarded section of this contract is running.
pub fn is_entered(env: &Env) -> bool {
    env.storage().instance().get(&ENTERED).unwrap_or(false)
}

/// Raise the flag. Returns `false`, leaving storage untouched, when it is
/// already raised.
pub fn enter(env: &Env) -> bool {
    if is_entered(env) {
        return false;
    }
    env.storage().instance().set(&ENTERED, &true);
    true
}

/// Lower the flag.
pub fn exit(env: &Env) {
    env.storage().instance().remove(&ENTERED);
}

/// Run `f` with the guard held.
///
/// Fails with `on_reentry` without calling `f` when the guard is already
/// held.
pub fn guarded<T, E, F>(env: &Env, on_reentry: E, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    if !enter(env) {
        return Err(on_reentry);
    }

    let result = f();
    exit(env);

    result
}
