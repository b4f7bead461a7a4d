//! Drive a scenario through a started coordinator.

use std::sync::Arc;

use session_coordinator::{
    Coordinator, EventSource, LaneStats, SessionOps, WindowId,
    test_support::{Effect, MockEventSource},
};
use tracing::{debug, info};

use crate::{
    error::Result,
    scenario::{Scenario, Step},
};

/// What a replay produced.
#[derive(Debug)]
pub struct Outcome {
    /// Every side effect, in order.
    pub effects: Vec<Effect>,
    /// Final lane counters.
    pub stats: LaneStats,
}

/// Run every step, then stop the coordinator and collect its effects.
///
/// Model changes wait for all earlier input to be processed first, so each
/// step sees the desktop exactly as the script describes it.
pub async fn play(scenario: &Scenario) -> Result<Outcome> {
    let session = scenario.build_session();
    let source = Arc::new(MockEventSource::new());
    let mut coord = Coordinator::new(
        Arc::new(session.clone()) as Arc<dyn SessionOps>,
        scenario.config.clone(),
    );
    let handle = coord.start(source.clone() as Arc<dyn EventSource>)?;

    for (index, step) in scenario.steps.iter().enumerate() {
        debug!(index, ?step, "replay_step");
        match step {
            Step::Lifecycle { kind, app } => source.emit_lifecycle(*kind, app.as_deref()),
            Step::PointerUp(location) => source.emit_pointer_up(*location),
            Step::PossiblyClosed(id) => handle.report_possibly_closed(WindowId::new(*id))?,
            model => {
                handle.flush().await?;
                model.apply(&session);
            }
        }
    }

    let stats = coord.stop().await?;
    info!(steps = scenario.steps.len(), ?stats, "replay_finished");
    Ok(Outcome {
        effects: session.take_effects(),
        stats,
    })
}

/// One-line rendering of an effect for the report.
pub fn describe(effect: &Effect) -> String {
    match effect {
        Effect::RefreshAndLayout {
            reason,
            definitely_unlocked,
        } => format!("refresh_and_layout {reason} unlocked={definitely_unlocked}"),
        Effect::RefreshSession {
            reason,
            definitely_unlocked,
        } => format!("refresh_session {reason} unlocked={definitely_unlocked}"),
        Effect::ResetManipulatedWithMouse => "reset_manipulated_with_mouse".to_string(),
        Effect::FocusWindow(id) => format!("focus_window {id}"),
        Effect::NativeFocusWindow(id) => format!("native_focus_window {id}"),
        Effect::FocusWorkspace(ws) => format!("focus_workspace {ws}"),
        Effect::Unhide(pid) => format!("unhide pid={pid}"),
    }
}
