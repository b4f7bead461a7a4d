//! Closed-windows cache.
//!
//! The window-destroyed signal is unreliable, so several detectors may report
//! the same logical close of a window: a pointer-up outside the focused
//! window and reports that name the window (the external periodic poll). The
//! cache makes sure only the first of them turns into a refresh. A window is
//! remembered once its refresh has actually been applied.
//!
//! Validity is bounded by user clicks, not wall-clock time: every pointer-up
//! clears the cache before anything else happens.

use std::collections::HashSet;

use tracing::trace;

use crate::ids::WindowId;

/// Set of window ids already reported as possibly closed since the last click.
#[derive(Debug, Default)]
pub struct ClosedWindowsCache {
    /// Ids remembered in the current click window.
    ids: HashSet<WindowId>,
}

impl ClosedWindowsCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `id` already triggered a refresh in the current click window.
    #[must_use]
    pub fn should_suppress(&self, id: WindowId) -> bool {
        self.ids.contains(&id)
    }

    /// Record that `id` has triggered a refresh.
    pub fn remember(&mut self, id: WindowId) {
        if self.ids.insert(id) {
            trace!(window = %id, size = self.ids.len(), "closed_cache_remember");
        }
    }

    /// Forget everything; called at the start of every pointer-up.
    pub fn reset(&mut self) {
        if !self.ids.is_empty() {
            trace!(size = self.ids.len(), "closed_cache_reset");
        }
        self.ids.clear();
    }

    /// Number of remembered ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_detector_is_suppressed() {
        let mut cache = ClosedWindowsCache::new();
        let w = WindowId::new(7);
        assert!(!cache.should_suppress(w));
        cache.remember(w);
        assert!(cache.should_suppress(w));
        assert!(!cache.should_suppress(WindowId::new(8)));
        cache.remember(w);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reset_opens_a_fresh_window() {
        let mut cache = ClosedWindowsCache::new();
        cache.remember(WindowId::new(1));
        cache.reset();
        assert!(cache.is_empty());
        assert!(!cache.should_suppress(WindowId::new(1)));
    }
}
