//! session-coordinator: turn workspace lifecycle notifications and pointer-up
//! events into a small number of ordered, de-duplicated refresh actions.
//!
//! The incoming stream is noisy and partly unreliable (window-destroyed
//! notifications in particular), so the coordinator combines three
//! independent defenses:
//! - the session guard refuses anything attributed to the lock screen, and
//!   treats pointer input as proof that the session is unlocked;
//! - the closed-windows cache collapses duplicate close detections within one
//!   click window;
//! - the action runner checks the live lock state whenever the guard could
//!   not decide, so the lock screen never sees a layout flicker.
//!
//! Components, leaf first:
//! - [`guard`]: per-event lock disposition
//! - [`closed_cache`]: close-detection dedup
//! - [`runner`]: FIFO action queue and executor
//! - [`click`]: pointer-up classification
//! - [`unhide`]: app visibility synchronizer
//! - [`Lane`]: glues them together for one event at a time
//! - [`Coordinator`]: `start`/`stop` lifecycle around a lane task
//!
//! The window-management model and the OS are reached only through
//! [`SessionOps`] and [`EventSource`]; [`test_support`] has in-memory versions.

pub mod action;
pub mod click;
pub mod closed_cache;
pub mod config;
mod coordinator;
mod error;
pub mod event;
mod focus;
pub mod geom;
pub mod guard;
pub mod ids;
mod lane;
mod ops;
pub mod runner;
mod source;
pub mod test_support;
pub mod unhide;

pub use action::{ActionKind, FollowUp, RefreshReason, SessionAction};
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CoordinatorHandle};
pub use error::{Error, Result};
pub use event::{Event, LOCK_SCREEN_APP_ID, LifecycleKind};
pub use focus::FocusTracker;
pub use geom::{Point, Rect};
pub use guard::Disposition;
pub use ids::{AppId, MonitorId, Pid, WindowId, WorkspaceId};
pub use lane::{Lane, LaneStats};
pub use ops::{AppRef, FocusTarget, MonitorRef, SessionOps};
pub use source::{EventSource, LifecycleHandler, PointerUpHandler, SubscriptionId};
