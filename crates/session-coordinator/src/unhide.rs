//! App visibility synchronizer.
//!
//! Runs as the follow-up of the refresh submitted for an app-hide
//! notification. Hidden apps don't fit a tiling model, so every app outside
//! the exception list is un-hidden again.
//!
//! "Hide this app" (cmd-h) is expected to move focus away from the hidden app,
//! so when exactly one app is hidden and it owned the previous focus, focus is
//! forced back onto that window first. "Hide others" leaves several apps
//! hidden and must not steal focus, so that branch is skipped.

use tracing::{debug, warn};

use crate::{
    config::CoordinatorConfig,
    ids::WindowId,
    ops::{AppRef, FocusTarget, SessionOps},
};

/// What one synchronizer pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// The pass was skipped because a switch is off.
    pub disabled: bool,
    /// Focus was forced back onto the previously focused window.
    pub forced_focus: Option<WindowId>,
    /// Apps that received an un-hide call which succeeded.
    pub unhidden: usize,
    /// Apps skipped because they are on the exception list.
    pub excepted: usize,
    /// Focus assertions and un-hide calls that failed.
    pub failures: usize,
}

/// Run one synchronizer pass. Failures are logged and counted, never
/// propagated; each app is handled independently.
pub fn synchronize(
    ops: &dyn SessionOps,
    config: &CoordinatorConfig,
    previous_focus: Option<&FocusTarget>,
) -> SyncReport {
    let mut report = SyncReport::default();
    if !config.unhide_enabled() {
        report.disabled = true;
        return report;
    }

    let apps = ops.tracked_apps();
    if let Some(window) = hide_this_app_window(ops, &apps, previous_focus) {
        report.forced_focus = Some(window);
        report.failures += force_focus(ops, window);
    }

    for app in &apps {
        if app
            .bundle_id
            .as_ref()
            .is_some_and(|id| config.is_unhide_exception(id))
        {
            report.excepted += 1;
            continue;
        }
        match ops.unhide_app(app.pid) {
            Ok(()) => report.unhidden += 1,
            Err(e) => {
                warn!(app = %app.label(), error = %e, "unhide_failed");
                report.failures += 1;
            }
        }
    }

    debug!(?report, "app_visibility_synchronized");
    report
}

/// The previously focused window, when its app is the one and only hidden app.
fn hide_this_app_window(
    ops: &dyn SessionOps,
    apps: &[AppRef],
    previous_focus: Option<&FocusTarget>,
) -> Option<WindowId> {
    let window = previous_focus?.window?;
    let owner = ops.window_owner(window)?;
    let owner_hidden = apps.iter().any(|a| a.pid == owner && a.is_hidden);
    let hidden_count = apps.iter().filter(|a| a.is_hidden).count();
    (owner_hidden && hidden_count == 1).then_some(window)
}

/// Assert focus twice: logical, then native. Either alone has proven
/// insufficient. Returns the number of assertions that failed.
fn force_focus(ops: &dyn SessionOps, window: WindowId) -> usize {
    let mut failures = 0;
    if let Err(e) = ops.focus_window(window) {
        warn!(window = %window, error = %e, "focus_assertion_failed");
        failures += 1;
    }
    if let Err(e) = ops.native_focus_window(window) {
        warn!(window = %window, error = %e, "native_focus_assertion_failed");
        failures += 1;
    }
    failures
}
