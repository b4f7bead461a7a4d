//! Scenario files: a desktop fixture plus an ordered script of steps.
//!
//! ```ron
//! (
//!     config: (automatically_unhide_on_app_hide: true),
//!     desktop: (
//!         monitors: [(id: 1, frame: (x: 0.0, y: 0.0, w: 1440.0, h: 900.0), workspace: "1")],
//!         apps: [(pid: 100, bundle_id: Some("com.example.editor"))],
//!         windows: [(id: 10, owner: 100, rect: Some((x: 0.0, y: 0.0, w: 720.0, h: 900.0)))],
//!         focus: (workspace: "1", window: Some(10)),
//!     ),
//!     steps: [
//!         SetHidden(pid: 100, hidden: true),
//!         Lifecycle(kind: Hide, app: Some("com.example.editor")),
//!         PointerUp((x: 1000.0, y: 10.0)),
//!     ],
//! )
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use session_coordinator::{
    CoordinatorConfig, LifecycleKind, MonitorId, Pid, Point, Rect, test_support::MockSession,
};

use crate::error::{Error, Result};

/// A complete replay script.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Coordinator configuration.
    #[serde(default)]
    pub config: CoordinatorConfig,
    /// Initial desktop state.
    #[serde(default)]
    pub desktop: Desktop,
    /// Steps, applied in order.
    pub steps: Vec<Step>,
}

/// Initial desktop state.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Desktop {
    /// Displays.
    pub monitors: Vec<Monitor>,
    /// Tracked applications.
    pub apps: Vec<App>,
    /// Windows and their owners.
    pub windows: Vec<Window>,
    /// Initial focus.
    pub focus: Focus,
    /// Whether the session starts locked.
    pub locked: bool,
}

/// A display.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Monitor {
    /// Display id.
    pub id: MonitorId,
    /// Display frame in global coordinates.
    pub frame: Rect,
    /// Workspace shown on the display.
    pub workspace: String,
}

/// An application.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct App {
    /// Process id.
    pub pid: Pid,
    /// Bundle identifier, if known.
    #[serde(default)]
    pub bundle_id: Option<String>,
    /// Initially hidden.
    #[serde(default)]
    pub hidden: bool,
}

/// A window.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Window {
    /// Window id.
    pub id: u32,
    /// Owning process.
    pub owner: Pid,
    /// Frame; `None` for windows without a usable rect.
    #[serde(default)]
    pub rect: Option<Rect>,
}

/// A focus target.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Focus {
    /// Focused workspace.
    pub workspace: String,
    /// Focused window, if any.
    #[serde(default)]
    pub window: Option<u32>,
}

impl Default for Focus {
    fn default() -> Self {
        Self {
            workspace: "1".into(),
            window: None,
        }
    }
}

/// One scripted step.
#[derive(Debug, Clone, Deserialize)]
pub enum Step {
    /// Deliver a lifecycle notification.
    Lifecycle {
        /// Notification kind.
        kind: LifecycleKind,
        /// Application the notification is about.
        #[serde(default)]
        app: Option<String>,
    },
    /// Deliver a left-button pointer-up.
    PointerUp(Point),
    /// The poll detector reports a window that may have closed.
    PossiblyClosed(u32),
    /// Change an application's hidden flag.
    SetHidden {
        /// Application process id.
        pid: Pid,
        /// New hidden flag.
        hidden: bool,
    },
    /// Move focus.
    SetFocus(Focus),
    /// Focus the next successful refresh moves to.
    FocusAfterRefresh(Focus),
    /// Remove a window from the model.
    CloseWindow(u32),
    /// Set the live lock state.
    Lock(bool),
    /// Make refresh calls fail (or succeed again).
    FailRefresh(bool),
}

impl Step {
    /// Apply a model-change step. Input steps are ignored here.
    pub fn apply(&self, session: &MockSession) {
        match self {
            Self::SetHidden { pid, hidden } => session.set_app_hidden(*pid, *hidden),
            Self::SetFocus(f) => session.set_focus(&f.workspace, f.window),
            Self::FocusAfterRefresh(f) => session.set_focus_after_refresh(&f.workspace, f.window),
            Self::CloseWindow(id) => session.remove_window(*id),
            Self::Lock(v) => session.set_locked(*v),
            Self::FailRefresh(v) => session.set_fail_refresh(*v),
            Self::Lifecycle { .. } | Self::PointerUp(_) | Self::PossiblyClosed(_) => {}
        }
    }
}

impl Scenario {
    /// Parse a scenario from RON text and check it for consistency.
    pub fn from_ron(text: &str) -> Result<Self> {
        let scenario: Self = ron::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ReadScenario {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Build the in-memory desktop the replay runs against.
    pub fn build_session(&self) -> MockSession {
        let d = &self.desktop;
        let session = MockSession::new();
        for m in &d.monitors {
            session.add_monitor(m.id, m.frame, &m.workspace);
        }
        for a in &d.apps {
            session.add_app(a.pid, a.bundle_id.as_deref(), a.hidden);
        }
        for w in &d.windows {
            session.add_window(w.id, w.owner, w.rect);
        }
        session.set_focus(&d.focus.workspace, d.focus.window);
        session.set_locked(d.locked);
        session
    }

    /// Reject windows owned by unknown apps and pids that are never tracked.
    fn validate(&self) -> Result<()> {
        let d = &self.desktop;
        let known = |pid: Pid| d.apps.iter().any(|a| a.pid == pid);
        if let Some(w) = d.windows.iter().find(|w| !known(w.owner)) {
            return Err(Error::inconsistent(format!(
                "window {} is owned by unknown pid {}",
                w.id, w.owner
            )));
        }
        for step in &self.steps {
            if let Step::SetHidden { pid, .. } = step
                && !known(*pid)
            {
                return Err(Error::inconsistent(format!(
                    "SetHidden refers to unknown pid {pid}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"(
        config: (automatically_unhide_on_app_hide: true, unhide_exception_ids: ["com.example.pinned"]),
        desktop: (
            monitors: [(id: 1, frame: (x: 0.0, y: 0.0, w: 1000.0, h: 800.0), workspace: "1")],
            apps: [
                (pid: 100, bundle_id: Some("com.example.editor")),
                (pid: 200, bundle_id: Some("com.example.pinned"), hidden: true),
            ],
            windows: [(id: 10, owner: 100, rect: Some((x: 0.0, y: 0.0, w: 500.0, h: 500.0)))],
            focus: (workspace: "1", window: Some(10)),
        ),
        steps: [
            SetHidden(pid: 100, hidden: true),
            Lifecycle(kind: Hide, app: Some("com.example.editor")),
            PointerUp((x: 900.0, y: 700.0)),
            PossiblyClosed(10),
        ],
    )"#;

    #[test]
    fn parses_a_full_scenario() {
        let s = Scenario::from_ron(BASIC).expect("parse");
        assert!(s.config.unhide_enabled());
        assert_eq!(s.desktop.apps.len(), 2);
        assert!(s.desktop.apps[1].hidden);
        assert_eq!(s.steps.len(), 4);
        assert!(matches!(
            s.steps[1],
            Step::Lifecycle {
                kind: LifecycleKind::Hide,
                ..
            }
        ));
        assert!(matches!(s.steps[2], Step::PointerUp(p) if p == Point::new(900.0, 700.0)));
    }

    #[test]
    fn desktop_and_config_are_optional() {
        let s = Scenario::from_ron("(steps: [Lifecycle(kind: Launch)])").expect("parse");
        assert_eq!(s.config, CoordinatorConfig::default());
        assert!(s.desktop.monitors.is_empty());
        assert_eq!(s.desktop.focus.workspace, "1");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Scenario::from_ron("(steps: [], extra: 1)").expect_err("must fail");
        assert!(matches!(err, Error::Scenario(_)));
    }

    #[test]
    fn windows_must_have_known_owners() {
        let text = r#"(
            desktop: (windows: [(id: 1, owner: 42)]),
            steps: [],
        )"#;
        let err = Scenario::from_ron(text).expect_err("must fail");
        assert!(matches!(err, Error::Inconsistent(_)));
    }

    #[test]
    fn build_session_reflects_fixture() {
        let s = Scenario::from_ron(BASIC).expect("parse");
        let session = s.build_session();
        assert!(!session.is_hidden(100));
        assert!(session.is_hidden(200));
        assert!(session.effects().is_empty());
    }
}
