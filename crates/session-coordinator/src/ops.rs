//! Window-model and OS operations the coordinator drives.

use crate::{
    Result,
    action::RefreshReason,
    geom::{Point, Rect},
    ids::{AppId, MonitorId, Pid, WindowId, WorkspaceId},
};

/// A display, as seen at the time of the query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorRef {
    /// Display identifier.
    pub id: MonitorId,
    /// Workspace currently shown on this display.
    pub active_workspace: WorkspaceId,
}

/// The window/workspace the model currently considers active.
///
/// Holds identifiers only. The model owns the objects; the coordinator looks
/// them up again through [`SessionOps`] whenever it needs fresh state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusTarget {
    /// Workspace that holds focus.
    pub workspace: WorkspaceId,
    /// Focused window, if the workspace has one.
    pub window: Option<WindowId>,
}

/// A running application tracked by the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppRef {
    /// Process identifier.
    pub pid: Pid,
    /// Bundle identifier, when the app has one.
    pub bundle_id: Option<AppId>,
    /// Whether the OS reports the app as hidden.
    pub is_hidden: bool,
}

impl AppRef {
    /// Human-readable label for logs and errors.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.bundle_id {
            Some(id) => id.to_string(),
            None => format!("pid {}", self.pid),
        }
    }
}

/// Window-management model and OS operations the coordinator depends on.
///
/// Every read is a point-in-time snapshot valid only while the current action
/// is being processed.
pub trait SessionOps: Send + Sync {
    /// Whether the session is locked right now.
    fn current_lock_state(&self) -> bool;

    /// Refresh the model and re-apply layout. Idempotent.
    ///
    /// `session_is_definitely_unlocked = false` asks the operation to run its
    /// own full lock check; `true` lets it skip the check.
    fn refresh_and_layout(
        &self,
        reason: &RefreshReason,
        session_is_definitely_unlocked: bool,
    ) -> Result<()>;

    /// Refresh the model without forcing layout. The runner executes the
    /// action's follow-up only after this returns `Ok`.
    fn refresh_session(
        &self,
        reason: &RefreshReason,
        session_is_definitely_unlocked: bool,
    ) -> Result<()>;

    /// Clear the "window is being manipulated with the mouse" marker, if the
    /// model allows it at this point.
    fn reset_manipulated_with_mouse(&self);

    /// Display under `location` (nearest display when between screens).
    fn monitor_at(&self, location: Point) -> MonitorRef;

    /// Current global focus target.
    fn focus(&self) -> FocusTarget;

    /// On-screen rectangle of a window, `None` when it has no visible frame.
    fn window_rect(&self, id: WindowId) -> Option<Rect>;

    /// Process owning a window, `None` when the window is gone.
    fn window_owner(&self, id: WindowId) -> Option<Pid>;

    /// Logical focus assertion through the model.
    fn focus_window(&self, id: WindowId) -> Result<()>;

    /// Native focus assertion straight through the OS.
    fn native_focus_window(&self, id: WindowId) -> Result<()>;

    /// Focus a workspace.
    fn focus_workspace(&self, workspace: &WorkspaceId) -> Result<()>;

    /// Every application the model tracks.
    fn tracked_apps(&self) -> Vec<AppRef>;

    /// OS-level un-hide of one application.
    fn unhide_app(&self, pid: Pid) -> Result<()>;
}
