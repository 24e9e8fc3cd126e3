#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use number_registry::{NumberRegistryContract, NumberRegistryContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    Address, Bytes, Env,
};

/// Commit and reveal with fuzzer-chosen numbers, salts and timing. Reveals
/// may mismatch their commitment in any field.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Commit {
        phone: u64,
        wallet: u8,
        salt: Vec<u8>,
    },
    Reveal {
        phone: u64,
        wallet: u8,
        salt: Vec<u8>,
    },
    AdvanceTime {
        delta: u32,
    },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let authority = Address::generate(&env);
    let contract_id = env.register(NumberRegistryContract, ());
    let client = NumberRegistryContractClient::new(&env, &contract_id);
    if client.try_initialize(&authority).is_err() {
        return;
    }

    let wallets: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    let mut expected: HashMap<u64, Address> = HashMap::new();

    for action in actions.into_iter() {
        match action {
            FuzzAction::Commit {
                phone,
                wallet,
                salt,
            } => {
                let w = &wallets[wallet as usize % wallets.len()];
                let fp = client.compute_fingerprint(&phone, w, &Bytes::from_slice(&env, &salt));
                client.commit(&authority, &fp);
                assert_eq!(
                    client.commitment_time(&fp),
                    Some(env.ledger().timestamp()),
                    "INVARIANT VIOLATION: commit did not record the current time"
                );
            }
            FuzzAction::Reveal {
                phone,
                wallet,
                salt,
            } => {
                let w = wallets[wallet as usize % wallets.len()].clone();
                let salt = Bytes::from_slice(&env, &salt);
                let fp = client.compute_fingerprint(&phone, &w, &salt);
                let had_commitment = client.has_commitment(&fp);

                match client.try_reveal(&authority, &phone, &w, &salt) {
                    Ok(Ok(previous)) => {
                        assert!(phone != 0, "INVARIANT VIOLATION: number zero registered");
                        assert!(had_commitment, "INVARIANT VIOLATION: reveal without commit");
                        assert!(
                            !client.has_commitment(&fp),
                            "INVARIANT VIOLATION: commitment reusable"
                        );
                        assert_eq!(
                            previous,
                            expected.get(&phone).cloned(),
                            "INVARIANT VIOLATION: wrong previous wallet"
                        );
                        expected.insert(phone, w);
                    }
                    _ => {
                        assert_eq!(
                            client.has_commitment(&fp),
                            had_commitment,
                            "INVARIANT VIOLATION: failed reveal touched the commitment"
                        );
                    }
                }
            }
            FuzzAction::AdvanceTime { delta } => {
                let ts = env.ledger().timestamp().saturating_add(delta as u64);
                env.ledger().set_timestamp(ts);
            }
        }

        // ── Post-action invariant checks ──
        for (phone, wallet) in &expected {
            assert_eq!(
                client.get_wallet(phone).as_ref(),
                Some(wallet),
                "INVARIANT VIOLATION: directory diverged from expected bindings"
            );
        }
    }
});
