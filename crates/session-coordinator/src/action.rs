//! Session actions: a primary refresh plus an optional follow-up.
//!
//! A follow-up is data, not a closure. The runner executes it after the
//! refresh succeeds, on the same lane, so nothing it does is observable before
//! the refresh it depends on.

use std::fmt;

use crate::{
    event::LifecycleKind,
    ids::{WindowId, WorkspaceId},
};

/// Which refresh operation to invoke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Refresh the model and re-apply layout.
    RefreshAndLayout,
    /// Refresh the model, then run the follow-up.
    Refresh,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RefreshAndLayout => "refresh_and_layout",
            Self::Refresh => "refresh_session",
        })
    }
}

/// Work that runs only after a successful refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FollowUp {
    /// Focus the given workspace (cross-monitor desktop click).
    FocusWorkspace(WorkspaceId),
    /// Run the app visibility synchronizer (app-hide notification).
    UnhideApps,
}

impl fmt::Display for FollowUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FocusWorkspace(ws) => write!(f, "focus_workspace({ws})"),
            Self::UnhideApps => f.write_str("unhide_apps"),
        }
    }
}

/// Why a refresh was requested; forwarded to the refresh operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshReason {
    /// A workspace lifecycle notification.
    GlobalObserver(LifecycleKind),
    /// A left-button pointer-up.
    LeftMouseUp,
    /// An external poll reported that a window may have closed.
    ClosedWindowPoll(WindowId),
}

impl fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalObserver(kind) => write!(f, "globalObserver({})", kind.notification_name()),
            Self::LeftMouseUp => f.write_str("globalObserverLeftMouseUp"),
            Self::ClosedWindowPoll(id) => write!(f, "closedWindowPoll({id})"),
        }
    }
}

/// Two-step action value: primary refresh, then optional follow-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionAction {
    /// Refresh operation to invoke.
    pub kind: ActionKind,
    /// Reason handed to the refresh operation.
    pub reason: RefreshReason,
    /// Optional work to run after the refresh succeeds.
    pub follow_up: Option<FollowUp>,
}

impl SessionAction {
    /// A `RefreshAndLayout` with no follow-up.
    #[must_use]
    pub fn refresh_and_layout(reason: RefreshReason) -> Self {
        Self {
            kind: ActionKind::RefreshAndLayout,
            reason,
            follow_up: None,
        }
    }

    /// A `Refresh` followed by `follow_up`.
    #[must_use]
    pub fn refresh_then(reason: RefreshReason, follow_up: FollowUp) -> Self {
        Self {
            kind: ActionKind::Refresh,
            reason,
            follow_up: Some(follow_up),
        }
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.reason)?;
        if let Some(follow_up) = &self.follow_up {
            write!(f, " -> {follow_up}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_render_like_observer_names() {
        assert_eq!(
            RefreshReason::GlobalObserver(LifecycleKind::Hide).to_string(),
            "globalObserver(NSWorkspaceDidHideApplicationNotification)"
        );
        assert_eq!(
            RefreshReason::LeftMouseUp.to_string(),
            "globalObserverLeftMouseUp"
        );
    }

    #[test]
    fn action_display_includes_follow_up() {
        let a = SessionAction::refresh_then(
            RefreshReason::LeftMouseUp,
            FollowUp::FocusWorkspace(WorkspaceId::new("2")),
        );
        assert_eq!(
            a.to_string(),
            "refresh_session[globalObserverLeftMouseUp] -> focus_workspace(2)"
        );
    }
}
