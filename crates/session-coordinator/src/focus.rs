//! Focus observations kept on the coordination lane.

use crate::ops::FocusTarget;

/// Current and previous focus targets, as last observed on the lane.
///
/// Only the lane updates this, so no locking is involved.
#[derive(Clone, Debug, Default)]
pub struct FocusTracker {
    /// Most recently observed focus.
    current: Option<FocusTarget>,
    /// Focus that was current before the last change.
    previous: Option<FocusTarget>,
}

impl FocusTracker {
    /// Create a tracker with no observations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh observation. Returns `true` when focus changed.
    pub fn observe(&mut self, target: FocusTarget) -> bool {
        if self.current.as_ref() == Some(&target) {
            return false;
        }
        self.previous = self.current.replace(target);
        true
    }

    /// Most recently observed focus.
    #[must_use]
    pub fn current(&self) -> Option<&FocusTarget> {
        self.current.as_ref()
    }

    /// Focus before the last change.
    #[must_use]
    pub fn previous(&self) -> Option<&FocusTarget> {
        self.previous.as_ref()
    }
}
