//! Re-entrancy guard that coalesces nested recompute requests

use std::cell::Cell;

/// How a call to [`RecomputeGuard::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A run was already in progress; the request was queued behind it
    Coalesced,
    /// No further request arrived after the last pass
    Settled {
        /// Passes executed, including the first
        passes: usize,
    },
    /// Requests kept arriving and the pass limit was hit
    CutOff {
        /// Passes executed
        passes: usize,
    },
}

/// Serializes recomputation of one reactive node
///
/// A request arriving while a pass runs (typically from a change
/// notification that loops back) sets a pending flag instead of recursing.
/// The running call then performs at most one follow-up pass per batch of
/// pending requests, up to `max_passes` passes in total. A forced request
/// still pending at the limit gets one extra forced pass; requests raised
/// during that pass are dropped.
#[derive(Debug)]
pub struct RecomputeGuard {
    max_passes: usize,
    running: Cell<bool>,
    pending: Cell<bool>,
    pending_force: Cell<bool>,
}

impl RecomputeGuard {
    /// Create a guard allowing `max_passes` passes per run (at least one)
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes: max_passes.max(1),
            running: Cell::new(false),
            pending: Cell::new(false),
            pending_force: Cell::new(false),
        }
    }

    /// Passes allowed per run
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Whether a run is in progress
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Run `pass`, folding re-entrant requests into follow-up passes
    ///
    /// `pass` receives the force flag of the request it serves; a follow-up
    /// pass is forced if any request folded into it was forced.
    pub fn run(&self, force: bool, mut pass: impl FnMut(bool)) -> RunOutcome {
        if self.running.get() {
            self.pending.set(true);
            if force {
                self.pending_force.set(true);
            }
            return RunOutcome::Coalesced;
        }

        self.running.set(true);
        let mut force = force;
        let mut passes = 1;
        let outcome = loop {
            pass(force);
            if !self.pending.replace(false) {
                break RunOutcome::Settled { passes };
            }
            force = self.pending_force.replace(false);
            if passes >= self.max_passes {
                if force {
                    pass(true);
                    passes += 1;
                    self.pending.set(false);
                    self.pending_force.set(false);
                }
                break RunOutcome::CutOff { passes };
            }
            passes += 1;
        };
        self.running.set(false);
        outcome
    }
}
