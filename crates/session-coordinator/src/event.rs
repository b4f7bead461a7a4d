//! Events delivered to the coordinator by the workspace event source.

use std::fmt;

use serde::Deserialize;

use crate::{geom::Point, ids::AppId};

/// Bundle identifier of the process that owns the lock screen.
///
/// Lifecycle notifications attributed to this app are never allowed to cause
/// a refresh; the lock screen itself can emit spurious launch/activate pairs.
pub const LOCK_SCREEN_APP_ID: &str = "com.apple.loginwindow";

/// Workspace-level application lifecycle signals the coordinator subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum LifecycleKind {
    /// An application finished launching.
    Launch,
    /// An application became frontmost.
    Activate,
    /// An application was hidden (cmd-h or "hide others").
    Hide,
    /// A hidden application was shown again.
    Unhide,
    /// An application stopped being frontmost.
    Deactivate,
    /// The active space changed.
    SpaceChange,
    /// An application exited.
    Terminate,
}

impl LifecycleKind {
    /// Every lifecycle kind, in subscription order.
    pub const ALL: [Self; 7] = [
        Self::Launch,
        Self::Activate,
        Self::Hide,
        Self::Unhide,
        Self::Deactivate,
        Self::SpaceChange,
        Self::Terminate,
    ];

    /// NSWorkspace notification name for this kind.
    #[must_use]
    pub const fn notification_name(self) -> &'static str {
        match self {
            Self::Launch => "NSWorkspaceDidLaunchApplicationNotification",
            Self::Activate => "NSWorkspaceDidActivateApplicationNotification",
            Self::Hide => "NSWorkspaceDidHideApplicationNotification",
            Self::Unhide => "NSWorkspaceDidUnhideApplicationNotification",
            Self::Deactivate => "NSWorkspaceDidDeactivateApplicationNotification",
            Self::SpaceChange => "NSWorkspaceActiveSpaceDidChangeNotification",
            Self::Terminate => "NSWorkspaceDidTerminateApplicationNotification",
        }
    }
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notification_name())
    }
}

/// A single input to the coordinator. Consumed once, never re-queued.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Workspace lifecycle notification, with the originating app if known.
    Lifecycle {
        /// Notification kind.
        kind: LifecycleKind,
        /// Bundle identifier of the app the notification is about.
        app: Option<AppId>,
    },
    /// A left-button pointer-up anywhere on any display.
    PointerUp {
        /// Global pointer location at release.
        location: Point,
    },
}

impl Event {
    /// Originating application identifier, if the event carries one.
    #[must_use]
    pub fn app(&self) -> Option<&AppId> {
        match self {
            Self::Lifecycle { app, .. } => app.as_ref(),
            Self::PointerUp { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_names_are_distinct() {
        let mut names: Vec<_> = LifecycleKind::ALL
            .iter()
            .map(|k| k.notification_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LifecycleKind::ALL.len());
    }
}
