//! Subscription surface of the OS event source.
//!
//! Handlers are invoked on the coordination queue. The coordinator's handlers
//! do nothing but forward into its lane, so they never block the source.

use crate::{event::LifecycleKind, geom::Point, ids::AppId};

/// Token returned by a subscription, used to remove it again.
pub type SubscriptionId = u64;

/// Callback for a lifecycle notification: kind plus originating app.
pub type LifecycleHandler = Box<dyn Fn(LifecycleKind, Option<AppId>) + Send + Sync>;

/// Callback for a pointer-up, with the global pointer location.
pub type PointerUpHandler = Box<dyn Fn(Point) + Send + Sync>;

/// Registration API for workspace lifecycle and pointer-up signals.
pub trait EventSource: Send + Sync {
    /// Register `handler` for one lifecycle kind.
    fn subscribe(&self, kind: LifecycleKind, handler: LifecycleHandler) -> SubscriptionId;

    /// Register `handler` for every left-button pointer-up on any display.
    fn subscribe_pointer_up(&self, handler: PointerUpHandler) -> SubscriptionId;

    /// Remove a registration. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
