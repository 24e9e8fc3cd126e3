//! Phone number → wallet bindings. Entries are overwritten, never deleted.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

const PHONE: Symbol = symbol_short!("PHONE");

fn phone_key(phone_number: u64) -> (Symbol, u64) {
    (PHONE, phone_number)
}

pub(crate) fn lookup(env: &Env, phone_number: u64) -> Option<Address> {
    env.storage().persistent().get(&phone_key(phone_number))
}

/// Bind `phone_number` to `wallet`, returning the previous binding.
pub(crate) fn bind(env: &Env, phone_number: u64, wallet: &Address) -> Option<Address> {
    let key = phone_key(phone_number);
    let previous = env.storage().persistent().get(&key);
    env.storage().persistent().set(&key, wallet);
    common::extend_persistent(env, &key);
    previous
}
