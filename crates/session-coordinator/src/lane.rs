//! The coordination lane.
//!
//! Every event goes through [`Lane::handle`], one at a time. The lane owns the
//! closed-windows cache and focus observations, turns each event into at most
//! one action, and drains the runner before returning, so an event's side
//! effects are complete before the next event is looked at.
//!
//! Only detectors that name a window consult the cache. Lifecycle
//! notifications are about apps, so they always refresh.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    action::{FollowUp, RefreshReason, SessionAction},
    click::{ClickDecision, classify_click},
    closed_cache::ClosedWindowsCache,
    config::CoordinatorConfig,
    event::{Event, LifecycleKind},
    focus::FocusTracker,
    geom::Point,
    guard::{self, Disposition},
    ids::WindowId,
    ops::SessionOps,
    runner::{ActionOutcome, ActionReport, ActionRunner, RunContext},
};

/// Counters describing everything the lane has done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneStats {
    /// Events handled.
    pub events: u64,
    /// Actions whose refresh succeeded.
    pub actions_applied: u64,
    /// Actions dropped because the session was locked.
    pub suppressed_locked: u64,
    /// Close detections dropped by the closed-windows cache.
    pub suppressed_duplicate: u64,
    /// Refreshes that reported failure.
    pub refresh_failures: u64,
    /// Failed follow-up steps.
    pub follow_up_failures: u64,
}

/// Synchronous coordinator state machine.
pub struct Lane {
    /// Model and OS operations.
    ops: Arc<dyn SessionOps>,
    /// Active configuration.
    config: CoordinatorConfig,
    /// Close-detection dedup set.
    cache: ClosedWindowsCache,
    /// Focus observations.
    focus: FocusTracker,
    /// Action queue and executor.
    runner: ActionRunner,
    /// Events handled.
    events: u64,
    /// Close detections dropped as duplicates.
    suppressed_duplicate: u64,
    /// Window whose close detection is queued; remembered once applied.
    pending_close: Option<WindowId>,
}

impl Lane {
    /// Build a lane over `ops` with a fixed configuration.
    pub fn new(ops: Arc<dyn SessionOps>, config: CoordinatorConfig) -> Self {
        Self {
            ops,
            config,
            cache: ClosedWindowsCache::new(),
            focus: FocusTracker::new(),
            runner: ActionRunner::new(),
            events: 0,
            suppressed_duplicate: 0,
            pending_close: None,
        }
    }

    /// Handle one event to completion.
    pub fn handle(&mut self, event: Event) -> Vec<ActionReport> {
        self.events += 1;
        let disposition = guard::classify(&event);
        match event {
            Event::PointerUp { location } => self.on_pointer_up(location),
            Event::Lifecycle { kind, .. } => self.on_lifecycle(kind, disposition),
        }
        self.drain()
    }

    /// Entry point for the periodic poll detector: `window` may have closed.
    pub fn report_possibly_closed(&mut self, window: WindowId) -> Vec<ActionReport> {
        if !self.is_duplicate_close(window) {
            self.runner.submit(
                SessionAction::refresh_and_layout(RefreshReason::ClosedWindowPoll(window)),
                Disposition::Unknown,
            );
            self.pending_close = Some(window);
        }
        self.drain()
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> LaneStats {
        let runner = self.runner.stats();
        LaneStats {
            events: self.events,
            actions_applied: runner.applied,
            suppressed_locked: runner.suppressed_locked,
            suppressed_duplicate: self.suppressed_duplicate,
            refresh_failures: runner.refresh_failures,
            follow_up_failures: runner.follow_up_failures,
        }
    }

    /// The closed-windows cache.
    #[must_use]
    pub fn cache(&self) -> &ClosedWindowsCache {
        &self.cache
    }

    /// Focus observations.
    #[must_use]
    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    /// Pointer-up: reset per-click state, then classify.
    fn on_pointer_up(&mut self, location: Point) {
        self.cache.reset();
        self.ops.reset_manipulated_with_mouse();
        self.focus.observe(self.ops.focus());

        let decision = classify_click(location, self.ops.as_ref());
        let close = match &decision {
            ClickDecision::OutsideFocusedWindow { window } => Some(*window),
            _ => None,
        };
        if close.is_some_and(|window| self.is_duplicate_close(window)) {
            return;
        }
        if let Some(action) = decision.into_action() {
            self.runner.submit(action, Disposition::DefinitelyUnlocked);
            self.pending_close = close;
        }
    }

    /// Lifecycle notification. Hide gets the synchronizer as follow-up,
    /// every other kind a plain refresh-and-layout.
    fn on_lifecycle(&mut self, kind: LifecycleKind, disposition: Disposition) {
        let reason = RefreshReason::GlobalObserver(kind);
        let action = match kind {
            LifecycleKind::Hide => SessionAction::refresh_then(reason, FollowUp::UnhideApps),
            _ => SessionAction::refresh_and_layout(reason),
        };

        if disposition != Disposition::DefinitelyLocked {
            self.focus.observe(self.ops.focus());
        }
        self.runner.submit(action, disposition);
    }

    /// True when `window` already produced a refresh in this click window.
    fn is_duplicate_close(&mut self, window: WindowId) -> bool {
        if self.cache.should_suppress(window) {
            self.suppressed_duplicate += 1;
            debug!(window = %window, "close_detection_deduplicated");
            return true;
        }
        false
    }

    /// Apply everything queued and log surfaced failures. A queued close
    /// detection is remembered only if its refresh was applied, so a locked
    /// no-op or a failed refresh leaves the cache untouched.
    fn drain(&mut self) -> Vec<ActionReport> {
        let mut cx = RunContext {
            ops: self.ops.as_ref(),
            config: &self.config,
            focus: &mut self.focus,
        };
        let reports = self.runner.drain(&mut cx);
        for report in &reports {
            if let Err(e) = &report.result {
                warn!(action = %report.action, error = %e, "action_failed");
            }
        }
        if let Some(window) = self.pending_close.take()
            && reports
                .iter()
                .any(|r| matches!(r.result, Ok(ActionOutcome::Applied { .. })))
        {
            self.cache.remember(window);
        }
        reports
    }
}
