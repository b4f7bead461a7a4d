//! Coordinator lifecycle: subscriptions in, one lane task out.
//!
//! [`Coordinator::start`] registers a handler for every lifecycle kind and for
//! pointer-up on the given [`EventSource`]. Handlers only forward into an
//! unbounded channel; a single spawned task drains that channel through a
//! [`Lane`], so events are processed strictly in delivery order and no two
//! actions ever interleave. Must be started from within a Tokio runtime.

use std::{fmt, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{info, trace, warn};

use crate::{
    Error, Result,
    config::CoordinatorConfig,
    event::{Event, LifecycleKind},
    geom::Point,
    ids::{AppId, WindowId},
    lane::{Lane, LaneStats},
    ops::SessionOps,
    source::{EventSource, SubscriptionId},
};

/// Messages accepted by the lane task.
enum Command {
    /// An event from the source.
    Event(Event),
    /// The poll detector reports a window that may have closed.
    PossiblyClosed(WindowId),
    /// Reply once everything queued before this has been processed.
    Flush {
        /// Completion signal.
        respond: oneshot::Sender<()>,
    },
    /// Reply with current counters.
    Stats {
        /// Reply channel.
        respond: oneshot::Sender<LaneStats>,
    },
    /// Finish queued work, then exit.
    Shutdown,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(ev) => f.debug_tuple("Event").field(ev).finish(),
            Self::PossiblyClosed(w) => f.debug_tuple("PossiblyClosed").field(w).finish(),
            Self::Flush { .. } => f.write_str("Flush"),
            Self::Stats { .. } => f.write_str("Stats"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Cheap, clonable handle to a running coordinator's lane.
#[derive(Clone, Debug)]
pub struct CoordinatorHandle {
    /// Lane input.
    tx: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    /// Inject an event as if the source had delivered it.
    pub fn submit(&self, event: Event) -> Result<()> {
        self.send(Command::Event(event))
    }

    /// Report that `window` may have closed (periodic poll detector).
    pub fn report_possibly_closed(&self, window: WindowId) -> Result<()> {
        self.send(Command::PossiblyClosed(window))
    }

    /// Wait until everything submitted before this call has been processed.
    pub async fn flush(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Flush { respond: tx })?;
        rx.await.map_err(|_| Error::LaneClosed)
    }

    /// Counters as of everything submitted before this call.
    pub async fn stats(&self) -> Result<LaneStats> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Stats { respond: tx })?;
        rx.await.map_err(|_| Error::LaneClosed)
    }

    /// Push a command into the lane.
    fn send(&self, cmd: Command) -> Result<()> {
        self.tx.send(cmd).map_err(|_| Error::LaneClosed)
    }
}

/// State held while started.
struct Running {
    /// Source the subscriptions live on.
    source: Arc<dyn EventSource>,
    /// Registrations to remove on stop.
    subscriptions: Vec<SubscriptionId>,
    /// Handle into the lane.
    handle: CoordinatorHandle,
    /// The lane task; yields final counters.
    task: JoinHandle<LaneStats>,
}

impl Running {
    /// Remove every registration so no new events arrive.
    fn unsubscribe_all(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.source.unsubscribe(id);
        }
    }
}

/// Explicitly constructed coordinator with a `start`/`stop` lifecycle.
pub struct Coordinator {
    /// Model and OS operations.
    ops: Arc<dyn SessionOps>,
    /// Configuration used for the next start.
    config: CoordinatorConfig,
    /// Present while started.
    running: Option<Running>,
}

impl Coordinator {
    /// Create a stopped coordinator.
    pub fn new(ops: Arc<dyn SessionOps>, config: CoordinatorConfig) -> Self {
        Self {
            ops,
            config,
            running: None,
        }
    }

    /// Subscribe to `source` and spawn the lane task.
    pub fn start(&mut self, source: Arc<dyn EventSource>) -> Result<CoordinatorHandle> {
        if self.running.is_some() {
            return Err(Error::AlreadyRunning);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let lane = Lane::new(self.ops.clone(), self.config.clone());
        let task = tokio::spawn(run_lane(rx, lane));

        let mut subscriptions = Vec::with_capacity(LifecycleKind::ALL.len() + 1);
        for kind in LifecycleKind::ALL {
            let tx = tx.clone();
            subscriptions.push(source.subscribe(
                kind,
                Box::new(move |kind: LifecycleKind, app: Option<AppId>| {
                    forward(&tx, Command::Event(Event::Lifecycle { kind, app }));
                }),
            ));
        }
        let pointer_tx = tx.clone();
        subscriptions.push(source.subscribe_pointer_up(Box::new(move |location: Point| {
            forward(&pointer_tx, Command::Event(Event::PointerUp { location }));
        })));

        let handle = CoordinatorHandle { tx };
        info!(
            subscriptions = subscriptions.len(),
            unhide = self.config.unhide_enabled(),
            "coordinator_started"
        );
        self.running = Some(Running {
            source,
            subscriptions,
            handle: handle.clone(),
            task,
        });
        Ok(handle)
    }

    /// Unsubscribe, let the lane finish queued work, and return final counters.
    pub async fn stop(&mut self) -> Result<LaneStats> {
        let mut running = self.running.take().ok_or(Error::NotRunning)?;
        running.unsubscribe_all();
        // The task may already be gone; joining below reports that.
        if running.handle.send(Command::Shutdown).is_err() {
            warn!("lane closed before shutdown");
        }
        let stats = running.task.await.map_err(|_| Error::LaneClosed)?;
        info!(?stats, "coordinator_stopped");
        Ok(stats)
    }

    /// True between `start` and `stop`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Handle into the running lane.
    #[must_use]
    pub fn handle(&self) -> Option<CoordinatorHandle> {
        self.running.as_ref().map(|r| r.handle.clone())
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if let Some(mut running) = self.running.take() {
            running.unsubscribe_all();
            if running.handle.send(Command::Shutdown).is_err() {
                trace!("lane already closed on drop");
            }
        }
    }
}

/// Handler body: hand the command to the lane and return immediately.
fn forward(tx: &mpsc::UnboundedSender<Command>, cmd: Command) {
    if let Err(e) = tx.send(cmd) {
        trace!(dropped = ?e.0, "lane closed; dropping event");
    }
}

/// Lane task body.
async fn run_lane(mut rx: mpsc::UnboundedReceiver<Command>, mut lane: Lane) -> LaneStats {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::Event(event) => {
                lane.handle(event);
            }
            Command::PossiblyClosed(window) => {
                lane.report_possibly_closed(window);
            }
            Command::Flush { respond } => {
                if respond.send(()).is_err() {
                    trace!("flush waiter went away");
                }
            }
            Command::Stats { respond } => {
                if respond.send(lane.stats()).is_err() {
                    trace!("stats waiter went away");
                }
            }
            Command::Shutdown => break,
        }
    }
    lane.stats()
}
