//! Session action runner.
//!
//! The runner is the single point of serialization. Actions wait in a FIFO
//! queue and are applied one at a time: an action's refresh and follow-up both
//! finish before the next action's refresh starts.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::{
    Error, Result,
    action::{ActionKind, FollowUp, SessionAction},
    config::CoordinatorConfig,
    focus::FocusTracker,
    guard::Disposition,
    ops::SessionOps,
    unhide::{SyncReport, synchronize},
};

/// Runner state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LaneState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// An action's refresh or follow-up is running.
    ProcessingAction,
}

/// Result of a follow-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowUpOutcome {
    /// Workspace focus attempted; `ok` is false when it failed.
    FocusedWorkspace {
        /// Whether the collaborator reported success.
        ok: bool,
    },
    /// The app visibility synchronizer ran.
    Synchronized(SyncReport),
}

/// Result of an action that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Refresh ran; the follow-up (if any) ran after it.
    Applied {
        /// Follow-up result, when the action had one.
        follow_up: Option<FollowUpOutcome>,
    },
    /// Session locked: nothing was touched.
    SuppressedLocked,
}

/// One processed action and what became of it.
#[derive(Debug)]
pub struct ActionReport {
    /// The action as submitted.
    pub action: SessionAction,
    /// Disposition it was submitted with.
    pub disposition: Disposition,
    /// Outcome, or the surfaced [`Error::RefreshFailed`].
    pub result: Result<ActionOutcome>,
}

/// Counters kept by the runner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunnerStats {
    /// Actions whose refresh succeeded.
    pub applied: u64,
    /// Actions dropped because the session was locked.
    pub suppressed_locked: u64,
    /// Refreshes that reported failure.
    pub refresh_failures: u64,
    /// Failed follow-up steps (focus assertions, un-hides, workspace focus).
    pub follow_up_failures: u64,
}

/// Collaborators and lane state an action needs while it runs.
pub struct RunContext<'a> {
    /// Model and OS operations.
    pub ops: &'a dyn SessionOps,
    /// Active configuration.
    pub config: &'a CoordinatorConfig,
    /// Focus observations, updated after each refresh.
    pub focus: &'a mut FocusTracker,
}

/// An action waiting in the queue.
#[derive(Debug)]
struct Pending {
    /// The action.
    action: SessionAction,
    /// Disposition computed when the action was submitted.
    disposition: Disposition,
}

/// FIFO action queue plus the logic that applies one action.
#[derive(Debug, Default)]
pub struct ActionRunner {
    /// Pending actions in submission order.
    queue: VecDeque<Pending>,
    /// Current state.
    state: LaneState,
    /// Counters.
    stats: RunnerStats,
}

impl ActionRunner {
    /// Idle runner with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action behind everything already submitted.
    pub fn submit(&mut self, action: SessionAction, disposition: Disposition) {
        debug!(action = %action, ?disposition, queued = self.queue.len(), "action_submitted");
        self.queue.push_back(Pending {
            action,
            disposition,
        });
    }

    /// Apply every queued action in order.
    pub fn drain(&mut self, cx: &mut RunContext<'_>) -> Vec<ActionReport> {
        let mut reports = Vec::with_capacity(self.queue.len());
        while let Some(Pending {
            action,
            disposition,
        }) = self.queue.pop_front()
        {
            let result = self.run(&action, disposition, cx);
            reports.push(ActionReport {
                action,
                disposition,
                result,
            });
        }
        reports
    }

    /// Apply a single action now, bypassing the queue.
    ///
    /// A locked session turns the call into a no-op apart from bookkeeping.
    /// `Unknown` consults the live lock state first. A failed refresh skips the
    /// follow-up and is returned to the caller; this layer never retries.
    pub fn run(
        &mut self,
        action: &SessionAction,
        disposition: Disposition,
        cx: &mut RunContext<'_>,
    ) -> Result<ActionOutcome> {
        self.state = LaneState::ProcessingAction;
        let result = self.execute(action, disposition, cx);
        self.state = LaneState::Idle;
        result
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LaneState {
        self.state
    }

    /// Number of queued actions.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> RunnerStats {
        self.stats
    }

    /// Body of [`Self::run`].
    fn execute(
        &mut self,
        action: &SessionAction,
        disposition: Disposition,
        cx: &mut RunContext<'_>,
    ) -> Result<ActionOutcome> {
        let locked = match disposition {
            Disposition::DefinitelyLocked => true,
            Disposition::DefinitelyUnlocked => false,
            Disposition::Unknown => cx.ops.current_lock_state(),
        };
        if locked {
            self.stats.suppressed_locked += 1;
            debug!(action = %action, ?disposition, "action_suppressed_locked");
            return Ok(ActionOutcome::SuppressedLocked);
        }

        let unlocked = disposition.is_definitely_unlocked();
        let refreshed = match action.kind {
            ActionKind::RefreshAndLayout => cx.ops.refresh_and_layout(&action.reason, unlocked),
            ActionKind::Refresh => cx.ops.refresh_session(&action.reason, unlocked),
        };
        if let Err(e) = refreshed {
            self.stats.refresh_failures += 1;
            return Err(match e {
                Error::RefreshFailed { .. } => e,
                other => Error::refresh(&action.reason, other.to_string()),
            });
        }
        self.stats.applied += 1;
        cx.focus.observe(cx.ops.focus());

        let follow_up = action
            .follow_up
            .as_ref()
            .map(|follow_up| self.follow_up(follow_up, cx));
        debug!(action = %action, ?follow_up, "action_applied");
        Ok(ActionOutcome::Applied { follow_up })
    }

    /// Run a follow-up after its refresh succeeded.
    fn follow_up(&mut self, follow_up: &FollowUp, cx: &mut RunContext<'_>) -> FollowUpOutcome {
        match follow_up {
            FollowUp::FocusWorkspace(workspace) => {
                let ok = match cx.ops.focus_workspace(workspace) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(workspace = %workspace, error = %e, "focus_workspace_failed");
                        self.stats.follow_up_failures += 1;
                        false
                    }
                };
                cx.focus.observe(cx.ops.focus());
                FollowUpOutcome::FocusedWorkspace { ok }
            }
            FollowUp::UnhideApps => {
                let report = synchronize(cx.ops, cx.config, cx.focus.previous());
                self.stats.follow_up_failures += report.failures as u64;
                FollowUpOutcome::Synchronized(report)
            }
        }
    }
}
