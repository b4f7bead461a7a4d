//! Pointer-up classification.
//!
//! Priority is fixed: a click on a display whose active workspace is not the
//! focused one wins over the outside-the-focused-window check. The branches
//! are exclusive; at most one action comes out of a click.

use tracing::debug;

use crate::{
    action::{FollowUp, RefreshReason, SessionAction},
    geom::Point,
    ids::{WindowId, WorkspaceId},
    ops::SessionOps,
};

/// What a pointer-up meant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickDecision {
    /// Desktop click on another display: refresh, then focus its workspace.
    CrossMonitor {
        /// Active workspace of the clicked display.
        workspace: WorkspaceId,
    },
    /// Click landed outside the focused window (or it has no visible frame).
    /// Typically a close button on an unfocused window, whose destroy
    /// notification cannot be relied on.
    OutsideFocusedWindow {
        /// The focused window at click time.
        window: WindowId,
    },
    /// Click inside the focused window; nothing to do.
    Ignore,
}

impl ClickDecision {
    /// Action to submit for this decision, if any.
    #[must_use]
    pub fn into_action(self) -> Option<SessionAction> {
        match self {
            Self::CrossMonitor { workspace } => Some(SessionAction::refresh_then(
                RefreshReason::LeftMouseUp,
                FollowUp::FocusWorkspace(workspace),
            )),
            Self::OutsideFocusedWindow { .. } => Some(SessionAction::refresh_and_layout(
                RefreshReason::LeftMouseUp,
            )),
            Self::Ignore => None,
        }
    }
}

/// Classify a pointer-up at `location` against current model state.
pub fn classify_click(location: Point, ops: &dyn SessionOps) -> ClickDecision {
    let monitor = ops.monitor_at(location);
    let focus = ops.focus();

    let decision = if monitor.active_workspace != focus.workspace {
        ClickDecision::CrossMonitor {
            workspace: monitor.active_workspace,
        }
    } else if let Some(window) = focus.window
        && !ops
            .window_rect(window)
            .is_some_and(|rect| rect.contains(location))
    {
        ClickDecision::OutsideFocusedWindow { window }
    } else {
        ClickDecision::Ignore
    };

    debug!(
        x = location.x,
        y = location.y,
        monitor = monitor.id,
        ?decision,
        "pointer_up_classified"
    );
    decision
}
