#![no_std]

//! # Guardian Wallet
//!
//! A smart wallet whose owner may move value and call out freely, and whose
//! control can be handed to a new owner by a threshold of guardians:
//!
//! - **Owner-gated execution**: `execute` transfers the wallet's value token
//!   and/or invokes a target contract, behind a non-reentrancy guard.
//! - **M-of-N recovery**: any guardian opens a request, others approve it.
//! - **Time-lock**: a threshold-approved request only finalises once the
//!   recovery delay has elapsed, giving the owner a window to cancel.
//! - **Nonce-scoped votes**: approvals for an abandoned request can never
//!   count toward a later one.
//!
//! Guardian-set, threshold and delay changes are refused while a recovery
//! is in flight.

pub mod events;
pub mod guardians;
pub mod recovery;


use common::{reentrancy_guard, SECS_PER_DAY};
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Env, IntoVal, Symbol, Val, Vec,
};

pub use recovery::{RecoveryRequest, RecoveryState, RecoveryStatus};

// ── Storage keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const INITIALIZED: Symbol = symbol_short!("INIT");
const THRESHOLD: Symbol = symbol_short!("THRESHOLD");
const RECOVERY_DELAY: Symbol = symbol_short!("REC_DELAY");
const VALUE_TOKEN: Symbol = symbol_short!("VAL_TOKEN");

/// Time-lock applied to a fresh wallet (1 day).
pub const DEFAULT_RECOVERY_DELAY: u64 = SECS_PER_DAY;
/// Upper bound for the time-lock (90 days).
pub const MAX_RECOVERY_DELAY: u64 = 90 * SECS_PER_DAY;

// ── Error codes ───────────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    NotGuardian = 4,
    OwnerCannotBeGuardian = 5,
    DuplicateGuardian = 6,
    GuardianNotFound = 7,
    InvalidThreshold = 8,
    ThresholdUnreachable = 9,
    InvalidRecoveryDelay = 10,
    InvalidNewOwner = 11,
    RecoveryAlreadyActive = 12,
    NoActiveRecovery = 13,
    RecoveryInProgress = 14,
    AlreadyApproved = 15,
    InsufficientApprovals = 16,
    TimelockNotExpired = 17,
    NonceOverflow = 18,
    InvalidAmount = 19,
    ReentrantCall = 20,
    ExternalCallFailed = 21,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct GuardianWalletContract;

#[contractimpl]
impl GuardianWalletContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the wallet.
    ///
    /// * `guardians`   — distinct addresses, none equal to `owner`.
    /// * `threshold`   — approvals needed to finalise a recovery, in
    ///                   `[1, guardians.len()]`.
    /// * `value_token` — the asset contract `execute` moves value in.
    pub fn initialize(
        env: Env,
        owner: Address,
        guardians: Vec<Address>,
        threshold: u32,
        value_token: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        owner.require_auth();

        guardians::init(&env, &owner, &guardians, threshold)?;

        env.storage().instance().set(&OWNER, &owner);
        env.storage().instance().set(&THRESHOLD, &threshold);
        env.storage()
            .instance()
            .set(&RECOVERY_DELAY, &DEFAULT_RECOVERY_DELAY);
        env.storage().instance().set(&VALUE_TOKEN, &value_token);
        env.storage().instance().set(&INITIALIZED, &true);
        common::extend_instance(&env);

        Ok(())
    }

    // ── Owner execution ──────────────────────────────────────────────────────

    /// Move `amount` of the value token to `target`, then invoke
    /// `function(args)` on it when a function is given.
    ///
    /// The whole call runs under the reentrancy guard: a call back into
    /// `execute` from `target` is rejected with `ReentrantCall`. If either
    /// sub-call fails the operation fails with `ExternalCallFailed` and no
    /// event is published.
    pub fn execute(
        env: Env,
        caller: Address,
        target: Address,
        amount: i128,
        function: Option<Symbol>,
        args: Vec<Val>,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        reentrancy_guard::guarded(&env, ContractError::ReentrantCall, || {
            if amount > 0 {
                Self::transfer_value(&env, &target, amount)?;
            }
            if let Some(function) = function {
                Self::call_external(&env, &target, &function, args)?;
            }
            Ok(())
        })?;
        common::extend_instance(&env);

        events::publish_transfer_executed(&env, &target, amount);
        Ok(())
    }

    // ── Recovery ─────────────────────────────────────────────────────────────

    /// Open a recovery request proposing `new_owner`; the initiating
    /// guardian's vote is counted immediately.
    ///
    /// Returns the nonce assigned to the request.
    pub fn initiate_recovery(
        env: Env,
        guardian: Address,
        new_owner: Address,
    ) -> Result<u64, ContractError> {
        guardian.require_auth();
        let owner = Self::load_owner(&env)?;
        Self::require_guardian(&env, &guardian)?;

        // A guardian taking over would leave the owner inside the guardian set.
        if new_owner == owner || guardians::contains(&env, &new_owner) {
            return Err(ContractError::InvalidNewOwner);
        }
        if recovery::load(&env).is_active() {
            return Err(ContractError::RecoveryAlreadyActive);
        }

        let nonce = recovery::advance_nonce(&env)?;
        recovery::record_vote(&env, nonce, &guardian);
        recovery::store_active(
            &env,
            &RecoveryRequest {
                proposed_owner: new_owner.clone(),
                approvals: 1,
                initiated_at: env.ledger().timestamp(),
                nonce,
            },
        );
        common::extend_instance(&env);

        events::publish_recovery_initiated(&env, &guardian, &new_owner, nonce);
        Ok(nonce)
    }

    /// Add the caller's vote to the active request. Returns the new count.
    pub fn approve_recovery(env: Env, guardian: Address) -> Result<u32, ContractError> {
        guardian.require_auth();
        Self::require_initialized(&env)?;
        Self::require_guardian(&env, &guardian)?;

        let mut request = recovery::load_active(&env)?;
        if recovery::has_voted(&env, request.nonce, &guardian) {
            return Err(ContractError::AlreadyApproved);
        }

        recovery::record_vote(&env, request.nonce, &guardian);
        request.approvals = request.approvals.saturating_add(1);
        recovery::store_active(&env, &request);
        common::extend_instance(&env);

        events::publish_recovery_approved(&env, &guardian, request.nonce, request.approvals);
        Ok(request.approvals)
    }

    /// Finalise the active request. Permissionless: the guardians already
    /// authorised the transition, anyone may trigger it once the time-lock
    /// has run out.
    pub fn execute_recovery(env: Env) -> Result<Address, ContractError> {
        let old_owner = Self::load_owner(&env)?;
        let request = recovery::load_active(&env)?;

        if request.approvals < Self::threshold(&env) {
            return Err(ContractError::InsufficientApprovals);
        }
        if env.ledger().timestamp() < request.unlocks_at(Self::recovery_delay(&env)) {
            return Err(ContractError::TimelockNotExpired);
        }

        env.storage()
            .instance()
            .set(&OWNER, &request.proposed_owner);
        recovery::clear(&env);
        common::extend_instance(&env);

        events::publish_owner_changed(&env, &old_owner, &request.proposed_owner);
        Ok(request.proposed_owner)
    }

    /// Owner veto: drop the active request regardless of its progress.
    pub fn cancel_recovery(env: Env, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let request = recovery::load_active(&env)?;
        recovery::clear(&env);
        common::extend_instance(&env);

        events::publish_recovery_cancelled(&env, &caller, request.nonce);
        Ok(())
    }

    // ── Configuration (owner, idle only) ─────────────────────────────────────

    /// Add `guardian` to the set. The owner cannot guard itself.
    pub fn add_guardian(env: Env, caller: Address, guardian: Address) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::require_idle(&env)?;

        guardians::add(&env, &caller, guardian.clone())?;
        common::extend_instance(&env);

        events::publish_guardian_changed(&env, &guardian, true);
        Ok(())
    }

    /// Remove a guardian. Fails if fewer guardians than the threshold would
    /// remain.
    pub fn remove_guardian(
        env: Env,
        caller: Address,
        guardian: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::require_idle(&env)?;

        guardians::remove(&env, &guardian, Self::threshold(&env))?;
        common::extend_instance(&env);

        events::publish_guardian_changed(&env, &guardian, false);
        Ok(())
    }

    /// Set the number of approvals a recovery needs, in `[1, guardian_count]`.
    pub fn change_threshold(env: Env, caller: Address, threshold: u32) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::require_idle(&env)?;

        guardians::check_threshold(threshold, guardians::count(&env))?;
        env.storage().instance().set(&THRESHOLD, &threshold);
        common::extend_instance(&env);

        events::publish_threshold_changed(&env, threshold);
        Ok(())
    }

    /// Set the recovery time-lock, in seconds: `0 < delay <= MAX_RECOVERY_DELAY`.
    pub fn change_recovery_delay(env: Env, caller: Address, delay: u64) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::require_idle(&env)?;

        if delay == 0 || delay > MAX_RECOVERY_DELAY {
            return Err(ContractError::InvalidRecoveryDelay);
        }
        env.storage().instance().set(&RECOVERY_DELAY, &delay);
        common::extend_instance(&env);

        events::publish_recovery_delay_changed(&env, delay);
        Ok(())
    }

    // ── Views ────────────────────────────────────────────────────────────────

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Self::load_owner(&env)
    }

    pub fn get_value_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&VALUE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_guardian(env: Env, candidate: Address) -> bool {
        guardians::contains(&env, &candidate)
    }

    pub fn get_guardians(env: Env) -> Vec<Address> {
        guardians::load(&env)
    }

    pub fn guardian_count(env: Env) -> u32 {
        guardians::count(&env)
    }

    pub fn get_threshold(env: Env) -> u32 {
        Self::threshold(&env)
    }

    pub fn get_recovery_delay(env: Env) -> u64 {
        Self::recovery_delay(&env)
    }

    /// Nonce of the most recently created request (0 before the first one).
    pub fn get_recovery_nonce(env: Env) -> u64 {
        recovery::current_nonce(&env)
    }

    pub fn get_recovery(env: Env) -> RecoveryState {
        recovery::load(&env)
    }

    pub fn recovery_status(env: Env) -> RecoveryStatus {
        match recovery::load(&env) {
            RecoveryState::Idle => RecoveryStatus::Idle,
            RecoveryState::Active(request) => request.status(
                Self::threshold(&env),
                Self::recovery_delay(&env),
                env.ledger().timestamp(),
            ),
        }
    }

    /// Whether `guardian` has voted on the active request.
    pub fn has_approved(env: Env, guardian: Address) -> bool {
        match recovery::load(&env) {
            RecoveryState::Active(request) => recovery::has_voted(&env, request.nonce, &guardian),
            RecoveryState::Idle => false,
        }
    }

    /// `true` only while an `execute` call is in progress.
    pub fn is_executing(env: Env) -> bool {
        reentrancy_guard::is_entered(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn load_owner(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if Self::load_owner(env)? != *caller {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn require_guardian(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if !guardians::contains(env, caller) {
            return Err(ContractError::NotGuardian);
        }
        Ok(())
    }

    fn require_idle(env: &Env) -> Result<(), ContractError> {
        if recovery::load(env).is_active() {
            return Err(ContractError::RecoveryInProgress);
        }
        Ok(())
    }

    fn threshold(env: &Env) -> u32 {
        env.storage().instance().get(&THRESHOLD).unwrap_or(0)
    }

    fn recovery_delay(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&RECOVERY_DELAY)
            .unwrap_or(DEFAULT_RECOVERY_DELAY)
    }

    /// Pay out of the wallet through the value token's `transfer`.
    fn transfer_value(env: &Env, to: &Address, amount: i128) -> Result<(), ContractError> {
        let token: Address = env
            .storage()
            .instance()
            .get(&VALUE_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        let args: Vec<Val> = (env.current_contract_address(), to.clone(), amount).into_val(env);
        Self::call_external(env, &token, &symbol_short!("transfer"), args)
    }

    /// Invoke `function` on `contract`, mapping any failure of the callee
    /// (error return, trap, missing contract) to `ExternalCallFailed`.
    fn call_external(
        env: &Env,
        contract: &Address,
        function: &Symbol,
        args: Vec<Val>,
    ) -> Result<(), ContractError> {
        match env.try_invoke_contract::<Val, soroban_sdk::Error>(contract, function, args) {
            Ok(Ok(_)) => Ok(()),
            _ => Err(ContractError::ExternalCallFailed),
        }
    }
}
