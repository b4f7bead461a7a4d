//! End-to-end behaviour of a started coordinator: ordering, lock handling,
//! close dedup across detectors, and app un-hiding.

use std::sync::Arc;

use session_coordinator::{
    Coordinator, CoordinatorConfig, CoordinatorHandle, EventSource, LOCK_SCREEN_APP_ID,
    LifecycleKind, Point, Rect, SessionOps, WindowId, WorkspaceId,
    test_support::{Effect, MockEventSource, MockSession},
};

/// A started coordinator over a two-monitor desktop.
struct Harness {
    session: MockSession,
    source: Arc<MockEventSource>,
    coord: Coordinator,
    handle: CoordinatorHandle,
}

impl Harness {
    fn start(config: CoordinatorConfig) -> Self {
        let session = MockSession::new();
        session.add_monitor(1, Rect::new(0.0, 0.0, 1000.0, 800.0), "1");
        session.add_monitor(2, Rect::new(1000.0, 0.0, 1000.0, 800.0), "2");
        session.add_app(100, Some("com.example.editor"), false);
        session.add_window(10, 100, Some(Rect::new(100.0, 100.0, 400.0, 300.0)));
        session.set_focus("1", Some(10));

        let source = Arc::new(MockEventSource::new());
        let mut coord = Coordinator::new(Arc::new(session.clone()) as Arc<dyn SessionOps>, config);
        let handle = coord
            .start(source.clone() as Arc<dyn EventSource>)
            .expect("start");
        Self {
            session,
            source,
            coord,
            handle,
        }
    }

    async fn settle(&self) {
        self.handle.flush().await.expect("flush");
    }
}

fn unhide_config(exceptions: &[&str]) -> CoordinatorConfig {
    CoordinatorConfig {
        automatically_unhide_on_app_hide: true,
        unhide_exception_ids: exceptions.iter().map(|s| (*s).to_string()).collect(),
        ..CoordinatorConfig::default()
    }
}

fn observer(kind: LifecycleKind) -> String {
    format!("globalObserver({})", kind.notification_name())
}

#[tokio::test]
async fn events_are_applied_in_delivery_order() {
    let h = Harness::start(CoordinatorConfig::default());

    h.source
        .emit_lifecycle(LifecycleKind::Activate, Some("com.example.editor"));
    h.source.emit_pointer_up(Point::new(1500.0, 100.0));
    h.source
        .emit_lifecycle(LifecycleKind::Launch, Some("com.example.viewer"));
    h.settle().await;

    assert_eq!(
        h.session.effects(),
        vec![
            Effect::RefreshAndLayout {
                reason: observer(LifecycleKind::Activate),
                definitely_unlocked: false,
            },
            Effect::ResetManipulatedWithMouse,
            Effect::RefreshSession {
                reason: "globalObserverLeftMouseUp".into(),
                definitely_unlocked: true,
            },
            Effect::FocusWorkspace(WorkspaceId::new("2")),
            Effect::RefreshAndLayout {
                reason: observer(LifecycleKind::Launch),
                definitely_unlocked: false,
            },
        ]
    );
}

#[tokio::test]
async fn click_inside_focused_window_only_resets() {
    let h = Harness::start(CoordinatorConfig::default());
    h.source.emit_pointer_up(Point::new(200.0, 200.0));
    h.settle().await;
    assert_eq!(h.session.effects(), vec![Effect::ResetManipulatedWithMouse]);
}

#[tokio::test]
async fn click_outside_focused_window_refreshes_and_lays_out() {
    let h = Harness::start(CoordinatorConfig::default());
    h.source.emit_pointer_up(Point::new(900.0, 700.0));
    h.settle().await;
    assert_eq!(
        h.session.effects(),
        vec![
            Effect::ResetManipulatedWithMouse,
            Effect::RefreshAndLayout {
                reason: "globalObserverLeftMouseUp".into(),
                definitely_unlocked: true,
            },
        ]
    );
}

#[tokio::test]
async fn lock_screen_notifications_never_touch_the_session() {
    let h = Harness::start(CoordinatorConfig::default());
    for kind in LifecycleKind::ALL {
        h.source.emit_lifecycle(kind, Some(LOCK_SCREEN_APP_ID));
    }
    h.settle().await;

    assert!(h.session.effects().is_empty());
    assert_eq!(h.session.lock_queries(), 0);
    let stats = h.handle.stats().await.expect("stats");
    assert_eq!(stats.events, 7);
    assert_eq!(stats.suppressed_locked, 7);
    assert_eq!(stats.actions_applied, 0);
}

#[tokio::test]
async fn undecided_events_consult_the_live_lock_state() {
    let h = Harness::start(CoordinatorConfig::default());
    h.session.set_locked(true);
    h.source.emit_lifecycle(LifecycleKind::SpaceChange, None);
    h.settle().await;
    assert!(h.session.effects().is_empty());
    assert_eq!(h.session.lock_queries(), 1);

    // Pointer input proves the session is unlocked; no query needed.
    h.source.emit_pointer_up(Point::new(900.0, 700.0));
    h.settle().await;
    assert_eq!(h.session.refresh_count(), 1);
    assert_eq!(h.session.lock_queries(), 1);
}

#[tokio::test]
async fn close_detectors_share_one_refresh_per_click() {
    let h = Harness::start(CoordinatorConfig::default());

    h.source.emit_pointer_up(Point::new(900.0, 700.0));
    h.handle
        .report_possibly_closed(WindowId::new(10))
        .expect("report");
    h.settle().await;
    assert_eq!(h.session.refresh_count(), 1);

    // The next click opens a fresh window for the same id.
    h.source.emit_pointer_up(Point::new(900.0, 700.0));
    h.settle().await;
    assert_eq!(h.session.refresh_count(), 2);

    let stats = h.handle.stats().await.expect("stats");
    assert_eq!(stats.suppressed_duplicate, 1);
}

#[tokio::test]
async fn app_notifications_after_a_click_are_never_deduplicated() {
    let h = Harness::start(CoordinatorConfig::default());

    h.source.emit_pointer_up(Point::new(900.0, 700.0));
    h.source
        .emit_lifecycle(LifecycleKind::Terminate, Some("com.example.viewer"));
    h.source
        .emit_lifecycle(LifecycleKind::Deactivate, Some("com.example.editor"));
    h.settle().await;

    assert_eq!(h.session.refresh_count(), 3);
    let stats = h.handle.stats().await.expect("stats");
    assert_eq!(stats.suppressed_duplicate, 0);
}

#[tokio::test]
async fn close_reported_while_locked_is_refreshed_after_unlock() {
    let h = Harness::start(CoordinatorConfig::default());
    h.session.set_locked(true);
    h.source
        .emit_lifecycle(LifecycleKind::Deactivate, Some("com.example.editor"));
    h.handle
        .report_possibly_closed(WindowId::new(10))
        .expect("report");
    h.settle().await;
    assert_eq!(h.session.refresh_count(), 0);

    h.session.set_locked(false);
    h.handle
        .report_possibly_closed(WindowId::new(10))
        .expect("report");
    h.settle().await;
    assert_eq!(h.session.refresh_count(), 1);
    let stats = h.handle.stats().await.expect("stats");
    assert_eq!(stats.suppressed_duplicate, 0);
    assert_eq!(stats.suppressed_locked, 2);
}

#[tokio::test]
async fn poll_detector_alone_refreshes_once() {
    let h = Harness::start(CoordinatorConfig::default());
    h.handle
        .report_possibly_closed(WindowId::new(42))
        .expect("report");
    h.handle
        .report_possibly_closed(WindowId::new(42))
        .expect("report");
    h.settle().await;
    assert_eq!(
        h.session.effects(),
        vec![Effect::RefreshAndLayout {
            reason: "closedWindowPoll(42)".into(),
            definitely_unlocked: false,
        }]
    );
}

#[tokio::test]
async fn hide_is_ignored_when_unhide_is_disabled() {
    let h = Harness::start(CoordinatorConfig::default());
    h.session.set_app_hidden(100, true);
    h.source
        .emit_lifecycle(LifecycleKind::Hide, Some("com.example.editor"));
    h.settle().await;
    assert_eq!(
        h.session.effects(),
        vec![Effect::RefreshSession {
            reason: observer(LifecycleKind::Hide),
            definitely_unlocked: false,
        }]
    );
    assert!(h.session.is_hidden(100));
}

#[tokio::test]
async fn hide_with_several_hidden_apps_skips_forced_focus() {
    let h = Harness::start(unhide_config(&["com.example.pinned"]));
    h.session.add_app(200, Some("com.example.viewer"), true);
    h.session.add_app(300, Some("com.example.pinned"), true);
    h.session.set_app_hidden(100, true);

    h.source
        .emit_lifecycle(LifecycleKind::Hide, Some("com.example.editor"));
    h.settle().await;

    assert_eq!(
        h.session.effects(),
        vec![
            Effect::RefreshSession {
                reason: observer(LifecycleKind::Hide),
                definitely_unlocked: false,
            },
            Effect::Unhide(100),
            Effect::Unhide(200),
        ]
    );
    assert!(!h.session.is_hidden(100));
    assert!(!h.session.is_hidden(200));
    assert!(h.session.is_hidden(300));
}

#[tokio::test]
async fn unhide_failures_do_not_stop_the_sweep() {
    let h = Harness::start(unhide_config(&[]));
    h.session.add_app(200, Some("com.example.viewer"), true);
    h.session.add_app(300, Some("com.example.mail"), true);
    h.session.set_fail_unhide(200, true);

    h.source
        .emit_lifecycle(LifecycleKind::Hide, Some("com.example.viewer"));
    h.settle().await;

    let unhidden: Vec<_> = h
        .session
        .effects()
        .into_iter()
        .filter(|e| matches!(e, Effect::Unhide(_)))
        .collect();
    assert_eq!(
        unhidden,
        vec![Effect::Unhide(100), Effect::Unhide(200), Effect::Unhide(300)]
    );
    assert!(h.session.is_hidden(200));
    assert!(!h.session.is_hidden(300));
    let stats = h.handle.stats().await.expect("stats");
    assert_eq!(stats.follow_up_failures, 1);
}

#[tokio::test]
async fn refresh_failure_surfaces_in_stats_and_lane_keeps_going() {
    let mut h = Harness::start(CoordinatorConfig::default());
    h.session.set_fail_refresh(true);
    h.source
        .emit_lifecycle(LifecycleKind::Activate, Some("com.example.editor"));
    h.settle().await;
    h.session.set_fail_refresh(false);
    h.source
        .emit_lifecycle(LifecycleKind::Activate, Some("com.example.editor"));

    let stats = h.coord.stop().await.expect("stop");
    assert_eq!(stats.events, 2);
    assert_eq!(stats.refresh_failures, 1);
    assert_eq!(stats.actions_applied, 1);
    assert_eq!(h.source.subscription_count(), 0);
}
