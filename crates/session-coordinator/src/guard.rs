//! Session guard: per-event belief about whether the screen is locked.
//!
//! Classification is pure. An [`Disposition::Unknown`] result obliges the
//! caller to consult the live lock state before touching shared state; see
//! [`crate::runner::ActionRunner`].

use crate::event::{Event, LOCK_SCREEN_APP_ID};

/// What an event tells us about the lock state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Proven unlocked. Pointer events only reach us when nothing intercepts
    /// them, and the lock screen intercepts all pointer input.
    DefinitelyUnlocked,
    /// The event originated from the lock screen process.
    DefinitelyLocked,
    /// Needs a live lock-state check.
    Unknown,
}

impl Disposition {
    /// Value for the `session_is_definitely_unlocked` argument of refresh calls.
    #[must_use]
    pub const fn is_definitely_unlocked(self) -> bool {
        matches!(self, Self::DefinitelyUnlocked)
    }
}

/// Classify an event. Never fails.
#[must_use]
pub fn classify(event: &Event) -> Disposition {
    match event {
        Event::PointerUp { .. } => Disposition::DefinitelyUnlocked,
        Event::Lifecycle { app, .. } => match app {
            Some(app) if app.as_str() == LOCK_SCREEN_APP_ID => Disposition::DefinitelyLocked,
            _ => Disposition::Unknown,
        },
    }
}
