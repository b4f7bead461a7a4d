//! Error types for the session coordinator.

use std::result::Result as StdResult;

use thiserror::Error;

use crate::ids::{WindowId, WorkspaceId};

/// Convenient result type for the coordinator crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the session coordinator.
#[derive(Debug, Error)]
pub enum Error {
    /// The external refresh operation reported failure. The action's
    /// follow-up is skipped and the error is surfaced to the event handler.
    #[error("Refresh failed ({reason}): {message}")]
    RefreshFailed {
        /// Refresh reason the action was submitted with.
        reason: String,
        /// Collaborator-supplied detail.
        message: String,
    },

    /// A focus assertion on a window did not take. Non-fatal.
    #[error("Focus assertion failed for window {window}: {message}")]
    FocusAssertionFailed {
        /// Window the focus was asserted on.
        window: WindowId,
        /// Collaborator-supplied detail.
        message: String,
    },

    /// Focusing a workspace after a cross-monitor click failed. Non-fatal.
    #[error("Failed to focus workspace {workspace}: {message}")]
    WorkspaceFocusFailed {
        /// Workspace that should have received focus.
        workspace: WorkspaceId,
        /// Collaborator-supplied detail.
        message: String,
    },

    /// Un-hiding one application failed. Non-fatal, per app.
    #[error("Failed to unhide {app}: {message}")]
    UnhideFailed {
        /// Bundle identifier or pid of the application.
        app: String,
        /// Collaborator-supplied detail.
        message: String,
    },

    /// `start` was called on a coordinator that is already running.
    #[error("Coordinator already running")]
    AlreadyRunning,

    /// An operation needs a running coordinator.
    #[error("Coordinator not running")]
    NotRunning,

    /// The coordination lane has shut down.
    #[error("Coordination lane closed")]
    LaneClosed,

    /// Configuration text could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

impl Error {
    /// Build a [`Error::RefreshFailed`] from any displayable reason.
    pub fn refresh(reason: impl ToString, message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            reason: reason.to_string(),
            message: message.into(),
        }
    }
}
