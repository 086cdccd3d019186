//! Attempt control for supersession: abort tokens and attempt sequencing.
//!
//! Every load attempt gets a fresh abort token and a sequence number. Starting
//! a new attempt raises the previous token so the transfer stops early, and
//! bumps the sequence so a late result from the old attempt is never applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cooperative abort flag shared with a running transfer.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abort. The transfer sees it on its next progress tick.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Identifies one attempt issued by an `AttemptControl`.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub seq: u64,
    pub token: AbortToken,
}

#[derive(Debug, Default)]
struct Slot {
    seq: u64,
    token: AbortToken,
}

/// Tracks the single live attempt of one owner.
#[derive(Debug, Default)]
pub struct AttemptControl {
    slot: Mutex<Slot>,
}

impl AttemptControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the live attempt (if any) and start a new one.
    pub fn begin(&self) -> Attempt {
        let mut slot = self.lock();
        slot.token.abort();
        slot.seq += 1;
        slot.token = AbortToken::new();
        Attempt {
            seq: slot.seq,
            token: slot.token.clone(),
        }
    }

    /// Abort the live attempt without starting another.
    pub fn cancel(&self) {
        self.cancel_and(|| {});
    }

    /// Like `cancel`, then runs `after` before any new attempt can begin.
    pub fn cancel_and<F>(&self, after: F)
    where
        F: FnOnce(),
    {
        let mut slot = self.lock();
        slot.token.abort();
        slot.seq += 1;
        after();
    }

    pub fn is_current(&self, attempt: &Attempt) -> bool {
        self.lock().seq == attempt.seq
    }

    /// Runs `apply` only if `attempt` is still the live one. The slot lock is
    /// held across `apply`, so no newer attempt can begin in between.
    /// Returns whether `apply` ran.
    pub fn apply_if_current<F>(&self, attempt: &Attempt, apply: F) -> bool
    where
        F: FnOnce(),
    {
        let slot = self.lock();
        if slot.seq != attempt.seq || attempt.token.is_aborted() {
            return false;
        }
        apply();
        true
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panic inside `apply` leaves the slot itself consistent.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
