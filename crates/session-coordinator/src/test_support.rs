//! In-memory collaborators for tests and offline replay.
//!
//! [`MockSession`] is a tiny desktop model that records every side effect the
//! coordinator causes, in order, and lets tests inject failures.
//! [`MockEventSource`] stores handlers and invokes them synchronously.

use std::{
    collections::{BTreeMap, BTreeSet},
    mem,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    Error, Result,
    action::RefreshReason,
    event::LifecycleKind,
    geom::{Point, Rect},
    ids::{AppId, MonitorId, Pid, WindowId, WorkspaceId},
    ops::{AppRef, FocusTarget, MonitorRef, SessionOps},
    source::{EventSource, LifecycleHandler, PointerUpHandler, SubscriptionId},
};

/// One observable side effect, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// `refresh_and_layout` was called.
    RefreshAndLayout {
        /// Rendered refresh reason.
        reason: String,
        /// Value of `session_is_definitely_unlocked`.
        definitely_unlocked: bool,
    },
    /// `refresh_session` was called.
    RefreshSession {
        /// Rendered refresh reason.
        reason: String,
        /// Value of `session_is_definitely_unlocked`.
        definitely_unlocked: bool,
    },
    /// The mouse-manipulation marker was reset.
    ResetManipulatedWithMouse,
    /// Logical focus asserted on a window.
    FocusWindow(WindowId),
    /// Native focus asserted on a window.
    NativeFocusWindow(WindowId),
    /// A workspace was focused.
    FocusWorkspace(WorkspaceId),
    /// An application was un-hidden.
    Unhide(Pid),
}

impl Effect {
    /// True for either refresh call.
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        matches!(self, Self::RefreshAndLayout { .. } | Self::RefreshSession { .. })
    }
}

/// A window in the mock model.
#[derive(Clone, Debug)]
struct MockWindow {
    /// Owning process.
    owner: Pid,
    /// On-screen frame, if visible.
    rect: Option<Rect>,
}

/// A display in the mock model.
#[derive(Clone, Debug)]
struct MockMonitor {
    /// Display id.
    id: MonitorId,
    /// Display frame.
    frame: Rect,
    /// Workspace shown on the display.
    active_workspace: WorkspaceId,
}

/// Mutable state behind [`MockSession`].
#[derive(Debug)]
struct Desktop {
    /// Displays in insertion order.
    monitors: Vec<MockMonitor>,
    /// Windows by id.
    windows: BTreeMap<WindowId, MockWindow>,
    /// Applications by pid; ordered so iteration is deterministic.
    apps: BTreeMap<Pid, AppRef>,
    /// Current focus.
    focus: FocusTarget,
    /// Focus the next successful refresh moves to.
    focus_after_refresh: Option<FocusTarget>,
    /// Apps whose un-hide fails.
    fail_unhide: BTreeSet<Pid>,
}

impl Default for Desktop {
    fn default() -> Self {
        Self {
            monitors: Vec::new(),
            windows: BTreeMap::new(),
            apps: BTreeMap::new(),
            focus: FocusTarget {
                workspace: WorkspaceId::new("1"),
                window: None,
            },
            focus_after_refresh: None,
            fail_unhide: BTreeSet::new(),
        }
    }
}

/// Recording, in-memory [`SessionOps`] implementation.
#[derive(Clone, Default)]
pub struct MockSession {
    /// Model state.
    desktop: Arc<Mutex<Desktop>>,
    /// Ordered side-effect log.
    effects: Arc<Mutex<Vec<Effect>>>,
    /// Live lock state.
    locked: Arc<AtomicBool>,
    /// Number of live lock-state queries.
    lock_queries: Arc<AtomicU64>,
    /// Make both refresh calls fail.
    fail_refresh: Arc<AtomicBool>,
    /// Make `focus_window` fail.
    fail_focus_window: Arc<AtomicBool>,
    /// Make `native_focus_window` fail.
    fail_native_focus: Arc<AtomicBool>,
    /// Make `focus_workspace` fail.
    fail_focus_workspace: Arc<AtomicBool>,
}

impl MockSession {
    /// Empty desktop: no monitors, no apps, focus on workspace `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a display showing `workspace`.
    pub fn add_monitor(&self, id: MonitorId, frame: Rect, workspace: &str) {
        self.desktop.lock().monitors.push(MockMonitor {
            id,
            frame,
            active_workspace: WorkspaceId::new(workspace),
        });
    }

    /// Change the workspace shown on a display.
    pub fn set_active_workspace(&self, monitor: MonitorId, workspace: &str) {
        let mut d = self.desktop.lock();
        if let Some(m) = d.monitors.iter_mut().find(|m| m.id == monitor) {
            m.active_workspace = WorkspaceId::new(workspace);
        }
    }

    /// Add a tracked application.
    pub fn add_app(&self, pid: Pid, bundle_id: Option<&str>, hidden: bool) {
        self.desktop.lock().apps.insert(
            pid,
            AppRef {
                pid,
                bundle_id: bundle_id.map(AppId::from),
                is_hidden: hidden,
            },
        );
    }

    /// Remove a tracked application and its windows.
    pub fn remove_app(&self, pid: Pid) {
        let mut d = self.desktop.lock();
        d.apps.remove(&pid);
        d.windows.retain(|_, w| w.owner != pid);
    }

    /// Mark an application hidden or visible.
    pub fn set_app_hidden(&self, pid: Pid, hidden: bool) {
        if let Some(app) = self.desktop.lock().apps.get_mut(&pid) {
            app.is_hidden = hidden;
        }
    }

    /// Add a window owned by `owner`.
    pub fn add_window(&self, id: u32, owner: Pid, rect: Option<Rect>) {
        self.desktop
            .lock()
            .windows
            .insert(WindowId::new(id), MockWindow { owner, rect });
    }

    /// Remove a window.
    pub fn remove_window(&self, id: u32) {
        self.desktop.lock().windows.remove(&WindowId::new(id));
    }

    /// Change a window's frame.
    pub fn set_window_rect(&self, id: u32, rect: Option<Rect>) {
        if let Some(w) = self.desktop.lock().windows.get_mut(&WindowId::new(id)) {
            w.rect = rect;
        }
    }

    /// Set the current focus.
    pub fn set_focus(&self, workspace: &str, window: Option<u32>) {
        self.desktop.lock().focus = FocusTarget {
            workspace: WorkspaceId::new(workspace),
            window: window.map(WindowId::new),
        };
    }

    /// Focus to adopt on the next successful refresh, simulating the model
    /// catching up with an OS-side focus change.
    pub fn set_focus_after_refresh(&self, workspace: &str, window: Option<u32>) {
        self.desktop.lock().focus_after_refresh = Some(FocusTarget {
            workspace: WorkspaceId::new(workspace),
            window: window.map(WindowId::new),
        });
    }

    /// Set the live lock state.
    pub fn set_locked(&self, v: bool) {
        self.locked.store(v, Ordering::SeqCst);
    }

    /// Make refresh calls fail.
    pub fn set_fail_refresh(&self, v: bool) {
        self.fail_refresh.store(v, Ordering::SeqCst);
    }

    /// Make the logical focus assertion fail.
    pub fn set_fail_focus_window(&self, v: bool) {
        self.fail_focus_window.store(v, Ordering::SeqCst);
    }

    /// Make the native focus assertion fail.
    pub fn set_fail_native_focus(&self, v: bool) {
        self.fail_native_focus.store(v, Ordering::SeqCst);
    }

    /// Make workspace focus fail.
    pub fn set_fail_focus_workspace(&self, v: bool) {
        self.fail_focus_workspace.store(v, Ordering::SeqCst);
    }

    /// Make un-hiding `pid` fail.
    pub fn set_fail_unhide(&self, pid: Pid, v: bool) {
        let mut d = self.desktop.lock();
        if v {
            d.fail_unhide.insert(pid);
        } else {
            d.fail_unhide.remove(&pid);
        }
    }

    /// Snapshot of the effect log.
    #[must_use]
    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().clone()
    }

    /// Drain the effect log.
    pub fn take_effects(&self) -> Vec<Effect> {
        mem::take(&mut *self.effects.lock())
    }

    /// Number of refresh calls recorded so far.
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.effects.lock().iter().filter(|e| e.is_refresh()).count()
    }

    /// Number of live lock-state queries so far.
    #[must_use]
    pub fn lock_queries(&self) -> u64 {
        self.lock_queries.load(Ordering::SeqCst)
    }

    /// Whether an app is currently hidden in the model.
    #[must_use]
    pub fn is_hidden(&self, pid: Pid) -> bool {
        self.desktop
            .lock()
            .apps
            .get(&pid)
            .is_some_and(|a| a.is_hidden)
    }

    /// Append to the effect log.
    fn note(&self, effect: Effect) {
        self.effects.lock().push(effect);
    }

    /// Shared body of both refresh calls.
    fn refresh(&self, effect: Effect, reason: &RefreshReason) -> Result<()> {
        self.note(effect);
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(Error::refresh(reason, "mock refresh failure"));
        }
        let mut d = self.desktop.lock();
        if let Some(next) = d.focus_after_refresh.take() {
            d.focus = next;
        }
        Ok(())
    }
}

impl SessionOps for MockSession {
    fn current_lock_state(&self) -> bool {
        self.lock_queries.fetch_add(1, Ordering::SeqCst);
        self.locked.load(Ordering::SeqCst)
    }

    fn refresh_and_layout(
        &self,
        reason: &RefreshReason,
        session_is_definitely_unlocked: bool,
    ) -> Result<()> {
        self.refresh(
            Effect::RefreshAndLayout {
                reason: reason.to_string(),
                definitely_unlocked: session_is_definitely_unlocked,
            },
            reason,
        )
    }

    fn refresh_session(
        &self,
        reason: &RefreshReason,
        session_is_definitely_unlocked: bool,
    ) -> Result<()> {
        self.refresh(
            Effect::RefreshSession {
                reason: reason.to_string(),
                definitely_unlocked: session_is_definitely_unlocked,
            },
            reason,
        )
    }

    fn reset_manipulated_with_mouse(&self) {
        self.note(Effect::ResetManipulatedWithMouse);
    }

    fn monitor_at(&self, location: Point) -> MonitorRef {
        let d = self.desktop.lock();
        let hit = d
            .monitors
            .iter()
            .find(|m| m.frame.contains(location))
            .or_else(|| {
                d.monitors.iter().min_by(|a, b| {
                    distance_sq(a.frame, location).total_cmp(&distance_sq(b.frame, location))
                })
            });
        match hit {
            Some(m) => MonitorRef {
                id: m.id,
                active_workspace: m.active_workspace.clone(),
            },
            None => MonitorRef {
                id: 0,
                active_workspace: d.focus.workspace.clone(),
            },
        }
    }

    fn focus(&self) -> FocusTarget {
        self.desktop.lock().focus.clone()
    }

    fn window_rect(&self, id: WindowId) -> Option<Rect> {
        self.desktop.lock().windows.get(&id).and_then(|w| w.rect)
    }

    fn window_owner(&self, id: WindowId) -> Option<Pid> {
        self.desktop.lock().windows.get(&id).map(|w| w.owner)
    }

    fn focus_window(&self, id: WindowId) -> Result<()> {
        self.note(Effect::FocusWindow(id));
        if self.fail_focus_window.load(Ordering::SeqCst) {
            return Err(Error::FocusAssertionFailed {
                window: id,
                message: "mock focus failure".into(),
            });
        }
        Ok(())
    }

    fn native_focus_window(&self, id: WindowId) -> Result<()> {
        self.note(Effect::NativeFocusWindow(id));
        if self.fail_native_focus.load(Ordering::SeqCst) {
            return Err(Error::FocusAssertionFailed {
                window: id,
                message: "mock native focus failure".into(),
            });
        }
        Ok(())
    }

    fn focus_workspace(&self, workspace: &WorkspaceId) -> Result<()> {
        self.note(Effect::FocusWorkspace(workspace.clone()));
        if self.fail_focus_workspace.load(Ordering::SeqCst) {
            return Err(Error::WorkspaceFocusFailed {
                workspace: workspace.clone(),
                message: "mock workspace focus failure".into(),
            });
        }
        self.desktop.lock().focus = FocusTarget {
            workspace: workspace.clone(),
            window: None,
        };
        Ok(())
    }

    fn tracked_apps(&self) -> Vec<AppRef> {
        self.desktop.lock().apps.values().cloned().collect()
    }

    fn unhide_app(&self, pid: Pid) -> Result<()> {
        self.note(Effect::Unhide(pid));
        let mut d = self.desktop.lock();
        if d.fail_unhide.contains(&pid) {
            return Err(Error::UnhideFailed {
                app: format!("pid {pid}"),
                message: "mock unhide failure".into(),
            });
        }
        if let Some(app) = d.apps.get_mut(&pid) {
            app.is_hidden = false;
        }
        Ok(())
    }
}

/// Squared distance from `p` to the centre of `r`.
fn distance_sq(r: Rect, p: Point) -> f64 {
    let dx = r.x + r.w / 2.0 - p.x;
    let dy = r.y + r.h / 2.0 - p.y;
    dx * dx + dy * dy
}

/// A registered handler.
enum Slot {
    /// Lifecycle handler for one kind.
    Lifecycle(LifecycleKind, LifecycleHandler),
    /// Pointer-up handler.
    PointerUp(PointerUpHandler),
}

/// [`EventSource`] that stores handlers and calls them on demand.
#[derive(Default)]
pub struct MockEventSource {
    /// Next subscription id.
    next_id: AtomicU64,
    /// Live registrations.
    slots: Mutex<Vec<(SubscriptionId, Arc<Slot>)>>,
}

impl MockEventSource {
    /// Source with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a lifecycle notification to every matching handler.
    pub fn emit_lifecycle(&self, kind: LifecycleKind, app: Option<&str>) {
        for slot in self.live_slots() {
            if let Slot::Lifecycle(k, handler) = slot.as_ref()
                && *k == kind
            {
                handler(kind, app.map(AppId::from));
            }
        }
    }

    /// Deliver a pointer-up to every pointer handler.
    pub fn emit_pointer_up(&self, location: Point) {
        for slot in self.live_slots() {
            if let Slot::PointerUp(handler) = slot.as_ref() {
                handler(location);
            }
        }
    }

    /// Number of live registrations.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Clone the registrations so handlers run without holding the lock.
    fn live_slots(&self) -> Vec<Arc<Slot>> {
        self.slots.lock().iter().map(|(_, s)| s.clone()).collect()
    }

    /// Store a registration and hand out its id.
    fn register(&self, slot: Slot) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.slots.lock().push((id, Arc::new(slot)));
        id
    }
}

impl EventSource for MockEventSource {
    fn subscribe(&self, kind: LifecycleKind, handler: LifecycleHandler) -> SubscriptionId {
        self.register(Slot::Lifecycle(kind, handler))
    }

    fn subscribe_pointer_up(&self, handler: PointerUpHandler) -> SubscriptionId {
        self.register(Slot::PointerUp(handler))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.slots.lock().retain(|(sid, _)| *sid != id);
    }
}
