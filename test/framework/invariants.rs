//! # State Invariant Definitions & Verification
//!
//! Invariants that must hold across every guardian wallet state transition.
//! They are checked after each action during state exploration and can be
//! composed via the `InvariantSet` builder.
//!
//! ## Complexity
//!
//! - Each check is O(g) or O(g²) in the number of guardians `g`; the
//!   distinctness check compares every pair. With `g <= 16` that is noise
//!   next to a single contract call.

extern crate std;

use std::boxed::Box;
use std::string::{String, ToString};
use std::vec::Vec;

use guardian_wallet::{RecoveryState, MAX_RECOVERY_DELAY};

use super::WalletSnapshot;

// ── Invariant Trait ──────────────────────────────────────────────────────────

/// A named invariant that can be verified against a state snapshot.
pub trait Invariant {
    /// Human-readable name for error messages.
    fn name(&self) -> &str;

    /// Check the invariant. Returns `Ok(())` on success, `Err(description)` on violation.
    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String>;
}

// ── Built-in Invariants ──────────────────────────────────────────────────────

/// **Reachable Threshold**: `1 <= threshold <= guardian_count`.
///
/// A threshold above the guardian count would make recovery impossible.
pub struct ThresholdReachable;

impl Invariant for ThresholdReachable {
    fn name(&self) -> &str {
        "1 <= threshold <= guardian_count"
    }

    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String> {
        if snapshot.threshold == 0 || snapshot.threshold > snapshot.guardian_count {
            return Err(std::format!(
                "threshold {} with {} guardians",
                snapshot.threshold, snapshot.guardian_count
            ));
        }
        if snapshot.guardian_count as usize != snapshot.guardians.len() {
            return Err(std::format!(
                "guardian_count {} disagrees with guardian list of {}",
                snapshot.guardian_count,
                snapshot.guardians.len()
            ));
        }
        Ok(())
    }
}

/// **Owner Outside Guardian Set**: the owner is never one of its own guardians.
pub struct OwnerNotGuardian;

impl Invariant for OwnerNotGuardian {
    fn name(&self) -> &str {
        "owner is not a guardian"
    }

    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String> {
        if snapshot.guardians.contains(&snapshot.owner) {
            return Err(std::format!("owner {:?} is in the guardian set", snapshot.owner));
        }
        Ok(())
    }
}

/// **Distinct Guardians**: no address appears twice in the guardian list.
pub struct DistinctGuardians;

impl Invariant for DistinctGuardians {
    fn name(&self) -> &str {
        "guardians are distinct"
    }

    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String> {
        for (i, g) in snapshot.guardians.iter().enumerate() {
            if snapshot.guardians[i + 1..].contains(g) {
                return Err(std::format!("guardian {:?} listed more than once", g));
            }
        }
        Ok(())
    }
}

pub struct RecoveryDelayBounded;

impl Invariant for RecoveryDelayBounded {
    fn name(&self) -> &str {
        "recovery_delay <= MAX_RECOVERY_DELAY"
    }

    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String> {
        if snapshot.recovery_delay > MAX_RECOVERY_DELAY {
            return Err(std::format!(
                "recovery delay {} exceeds cap {}",
                snapshot.recovery_delay, MAX_RECOVERY_DELAY
            ));
        }
        Ok(())
    }
}

/// **Well-Formed Request**: an active request carries the current nonce, at
/// least the initiator's vote and no more votes than there are guardians,
/// proposes someone other than the owner, and was opened no later than now.
pub struct ActiveRequestWellFormed;

impl Invariant for ActiveRequestWellFormed {
    fn name(&self) -> &str {
        "active recovery request is well-formed"
    }

    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String> {
        let request = match &snapshot.recovery {
            RecoveryState::Idle => return Ok(()),
            RecoveryState::Active(request) => request,
        };
        if request.nonce != snapshot.nonce {
            return Err(std::format!(
                "request nonce {} but wallet nonce {}",
                request.nonce, snapshot.nonce
            ));
        }
        if request.approvals == 0 || request.approvals > snapshot.guardian_count {
            return Err(std::format!(
                "{} approvals with {} guardians",
                request.approvals, snapshot.guardian_count
            ));
        }
        if request.proposed_owner == snapshot.owner {
            return Err("request proposes the current owner".to_string());
        }
        if request.initiated_at > snapshot.timestamp {
            return Err(std::format!(
                "request opened at {} after current time {}",
                request.initiated_at, snapshot.timestamp
            ));
        }
        Ok(())
    }
}

/// **Guard Released**: between top-level calls the reentrancy flag is clear.
pub struct GuardReleased;

impl Invariant for GuardReleased {
    fn name(&self) -> &str {
        "reentrancy guard released between calls"
    }

    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String> {
        if snapshot.executing {
            return Err("reentrancy guard still held".to_string());
        }
        Ok(())
    }
}

pub struct NonNegativeBalance;

impl Invariant for NonNegativeBalance {
    fn name(&self) -> &str {
        "wallet balance >= 0"
    }

    fn check(&self, snapshot: &WalletSnapshot) -> Result<(), String> {
        if snapshot.balance < 0 {
            return Err(std::format!("wallet balance is {}", snapshot.balance));
        }
        Ok(())
    }
}

// ── Invariant Set ────────────────────────────────────────────────────────────

/// A composable set of invariants that are checked together.
pub struct InvariantSet {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantSet {
    pub fn new() -> Self {
        Self {
            invariants: Vec::new(),
        }
    }

    /// Create a set pre-loaded with all built-in wallet invariants.
    pub fn wallet_defaults() -> Self {
        let mut set = Self::new();
        set.add(Box::new(ThresholdReachable));
        set.add(Box::new(OwnerNotGuardian));
        set.add(Box::new(DistinctGuardians));
        set.add(Box::new(RecoveryDelayBounded));
        set.add(Box::new(ActiveRequestWellFormed));
        set.add(Box::new(GuardReleased));
        set.add(Box::new(NonNegativeBalance));
        set
    }

    pub fn add(&mut self, invariant: Box<dyn Invariant>) {
        self.invariants.push(invariant);
    }

    /// Verify all invariants against a snapshot.
    /// Returns a list of (invariant_name, violation_message) for all failures.
    pub fn check_all(&self, snapshot: &WalletSnapshot) -> Vec<(String, String)> {
        let mut violations = Vec::new();
        for inv in &self.invariants {
            if let Err(msg) = inv.check(snapshot) {
                violations.push((inv.name().to_string(), msg));
            }
        }
        violations
    }

    /// Assert all invariants hold, panicking with details on violation.
    pub fn assert_all(&self, snapshot: &WalletSnapshot) {
        let violations = self.check_all(snapshot);
        if !violations.is_empty() {
            let mut report = String::from("Invariant violations detected:\n");
            for (name, msg) in &violations {
                report.push_str(&std::format!("  ✗ [{}]: {}\n", name, msg));
            }
            panic!("{}", report);
        }
    }

    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl Default for InvariantSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Transition Invariants ────────────────────────────────────────────────────

/// Invariants relating two consecutive snapshots (before and after an action).
pub trait TransitionInvariant {
    fn name(&self) -> &str;
    fn check(&self, before: &WalletSnapshot, after: &WalletSnapshot) -> Result<(), String>;
}

/// **Monotonic Nonce**: the recovery nonce never decreases, and grows by at
/// most one per action.
pub struct NonceMonotonic;

impl TransitionInvariant for NonceMonotonic {
    fn name(&self) -> &str {
        "recovery nonce is monotonic"
    }

    fn check(&self, before: &WalletSnapshot, after: &WalletSnapshot) -> Result<(), String> {
        if after.nonce < before.nonce || after.nonce > before.nonce.saturating_add(1) {
            return Err(std::format!("nonce moved {} -> {}", before.nonce, after.nonce));
        }
        Ok(())
    }
}

/// **Owner Changes Only Through Recovery**: the owner may only change when
/// the active request is consumed, and then only to its proposed owner.
pub struct OwnerChangesOnlyByRecovery;

impl TransitionInvariant for OwnerChangesOnlyByRecovery {
    fn name(&self) -> &str {
        "owner changes only by executing recovery"
    }

    fn check(&self, before: &WalletSnapshot, after: &WalletSnapshot) -> Result<(), String> {
        if before.owner == after.owner {
            return Ok(());
        }
        match (&before.recovery, &after.recovery) {
            (RecoveryState::Active(request), RecoveryState::Idle)
                if request.proposed_owner == after.owner =>
            {
                if after.timestamp < request.initiated_at.saturating_add(before.recovery_delay) {
                    return Err(std::format!(
                        "owner changed at {} before time-lock end {}",
                        after.timestamp,
                        request.initiated_at.saturating_add(before.recovery_delay)
                    ));
                }
                if request.approvals < before.threshold {
                    return Err(std::format!(
                        "owner changed with {} of {} approvals",
                        request.approvals, before.threshold
                    ));
                }
                Ok(())
            }
            _ => Err(std::format!(
                "owner changed {:?} -> {:?} without a matching recovery",
                before.owner, after.owner
            )),
        }
    }
}

/// **Frozen Configuration**: while a request is active, the guardian set,
/// threshold and delay do not change.
pub struct ConfigFrozenDuringRecovery;

impl TransitionInvariant for ConfigFrozenDuringRecovery {
    fn name(&self) -> &str {
        "configuration frozen during recovery"
    }

    fn check(&self, before: &WalletSnapshot, after: &WalletSnapshot) -> Result<(), String> {
        if !before.recovery.is_active() {
            return Ok(());
        }
        if before.guardians != after.guardians
            || before.threshold != after.threshold
            || before.recovery_delay != after.recovery_delay
        {
            return Err("guardian configuration changed while recovery was active".to_string());
        }
        Ok(())
    }
}

/// Composite checker for transition invariants.
pub struct TransitionInvariantSet {
    invariants: Vec<Box<dyn TransitionInvariant>>,
}

impl TransitionInvariantSet {
    pub fn new() -> Self {
        Self {
            invariants: Vec::new(),
        }
    }

    pub fn wallet_defaults() -> Self {
        let mut set = Self::new();
        set.add(Box::new(NonceMonotonic));
        set.add(Box::new(OwnerChangesOnlyByRecovery));
        set.add(Box::new(ConfigFrozenDuringRecovery));
        set
    }

    pub fn add(&mut self, invariant: Box<dyn TransitionInvariant>) {
        self.invariants.push(invariant);
    }

    pub fn check_all(
        &self,
        before: &WalletSnapshot,
        after: &WalletSnapshot,
    ) -> Vec<(String, String)> {
        let mut violations = Vec::new();
        for inv in &self.invariants {
            if let Err(msg) = inv.check(before, after) {
                violations.push((inv.name().to_string(), msg));
            }
        }
        violations
    }

    pub fn assert_all(&self, before: &WalletSnapshot, after: &WalletSnapshot) {
        let violations = self.check_all(before, after);
        if !violations.is_empty() {
            let mut report = String::from("Transition invariant violations:\n");
            for (name, msg) in &violations {
                report.push_str(&std::format!("  ✗ [{}]: {}\n", name, msg));
            }
            panic!("{}", report);
        }
    }
}

impl Default for TransitionInvariantSet {
    fn default() -> Self {
        Self::new()
    }
}
