//! Coordinator configuration.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{Result, ids::AppId};

/// Options the coordinator reads. Immutable while a coordinator is running.
///
/// ```ron
/// (
///     feature_enabled: true,
///     automatically_unhide_on_app_hide: true,
///     unhide_exception_ids: ["com.apple.finder"],
/// )
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoordinatorConfig {
    /// Master switch for window management.
    pub feature_enabled: bool,
    /// Un-hide applications whenever one gets hidden.
    pub automatically_unhide_on_app_hide: bool,
    /// Bundle identifiers that stay hidden.
    pub unhide_exception_ids: BTreeSet<String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            feature_enabled: true,
            automatically_unhide_on_app_hide: false,
            unhide_exception_ids: BTreeSet::new(),
        }
    }
}

impl CoordinatorConfig {
    /// Parse a configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Whether the app visibility synchronizer should act at all.
    #[must_use]
    pub fn unhide_enabled(&self) -> bool {
        self.feature_enabled && self.automatically_unhide_on_app_hide
    }

    /// True when `app` is on the un-hide exception list.
    #[must_use]
    pub fn is_unhide_exception(&self, app: &AppId) -> bool {
        self.unhide_exception_ids.contains(app.as_str())
    }
}
