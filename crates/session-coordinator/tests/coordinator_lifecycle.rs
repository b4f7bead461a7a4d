use std::sync::Arc;

use session_coordinator::{
    Coordinator, CoordinatorConfig, Error, EventSource, LifecycleKind, Point, Rect, SessionOps,
    test_support::{MockEventSource, MockSession},
};

fn desktop() -> MockSession {
    let s = MockSession::new();
    s.add_monitor(1, Rect::new(0.0, 0.0, 1440.0, 900.0), "1");
    s.add_app(100, Some("com.example.editor"), false);
    s.add_window(10, 100, Some(Rect::new(0.0, 0.0, 720.0, 900.0)));
    s.set_focus("1", Some(10));
    s
}

fn coordinator(session: &MockSession) -> Coordinator {
    Coordinator::new(
        Arc::new(session.clone()) as Arc<dyn SessionOps>,
        CoordinatorConfig::default(),
    )
}

#[tokio::test]
async fn start_subscribes_every_kind_and_stop_removes_them() {
    let session = desktop();
    let source = Arc::new(MockEventSource::new());
    let mut coord = coordinator(&session);

    coord
        .start(source.clone() as Arc<dyn EventSource>)
        .expect("start");
    assert!(coord.is_running());
    assert_eq!(source.subscription_count(), LifecycleKind::ALL.len() + 1);

    let stats = coord.stop().await.expect("stop");
    assert_eq!(stats.events, 0);
    assert_eq!(source.subscription_count(), 0);
    assert!(!coord.is_running());
}

#[tokio::test]
async fn double_start_and_double_stop_are_rejected() {
    let session = desktop();
    let source = Arc::new(MockEventSource::new());
    let mut coord = coordinator(&session);

    coord
        .start(source.clone() as Arc<dyn EventSource>)
        .expect("start");
    assert!(matches!(
        coord.start(source.clone() as Arc<dyn EventSource>),
        Err(Error::AlreadyRunning)
    ));
    coord.stop().await.expect("stop");
    assert!(matches!(coord.stop().await, Err(Error::NotRunning)));
}

#[tokio::test]
async fn stop_finishes_queued_events() {
    let session = desktop();
    let source = Arc::new(MockEventSource::new());
    let mut coord = coordinator(&session);
    coord
        .start(source.clone() as Arc<dyn EventSource>)
        .expect("start");

    source.emit_lifecycle(LifecycleKind::Launch, Some("com.example.viewer"));
    source.emit_lifecycle(LifecycleKind::Activate, Some("com.example.viewer"));
    let stats = coord.stop().await.expect("stop");

    assert_eq!(stats.events, 2);
    assert_eq!(stats.actions_applied, 2);
    assert_eq!(session.refresh_count(), 2);
}

#[tokio::test]
async fn events_after_stop_are_not_seen() {
    let session = desktop();
    let source = Arc::new(MockEventSource::new());
    let mut coord = coordinator(&session);
    coord
        .start(source.clone() as Arc<dyn EventSource>)
        .expect("start");
    coord.stop().await.expect("stop");

    source.emit_lifecycle(LifecycleKind::Activate, Some("com.example.viewer"));
    source.emit_pointer_up(Point::new(1000.0, 10.0));
    assert!(session.effects().is_empty());
}

#[tokio::test]
async fn dropping_a_running_coordinator_unsubscribes() {
    let session = desktop();
    let source = Arc::new(MockEventSource::new());
    {
        let mut coord = coordinator(&session);
        coord
            .start(source.clone() as Arc<dyn EventSource>)
            .expect("start");
    }
    assert_eq!(source.subscription_count(), 0);
}

#[tokio::test]
async fn handle_reports_lane_closed_after_stop() {
    let session = desktop();
    let source = Arc::new(MockEventSource::new());
    let mut coord = coordinator(&session);
    let handle = coord
        .start(source.clone() as Arc<dyn EventSource>)
        .expect("start");
    handle.flush().await.expect("flush while running");
    coord.stop().await.expect("stop");
    assert!(matches!(handle.flush().await, Err(Error::LaneClosed)));
}
