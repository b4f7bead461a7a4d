#![warn(missing_docs)]

//! Shared logging helpers and CLI argument definitions for the session
//! coordinator workspace.
//!
//! Binaries flatten [`LogArgs`] into their clap parser, then turn it into an
//! [`EnvFilter`] with [`LogArgs::filter`]. Level flags only raise verbosity for
//! our own crates so dependency noise stays at the default.

use std::env;

use clap::Args;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<Level>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "session_coordinator=trace,session_replay=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Filter spec string for these arguments.
    pub fn spec(&self) -> String {
        let level = self.log_level.map(|l| l.as_str().to_ascii_lowercase());
        compute_spec(
            self.trace,
            self.debug,
            level.as_deref(),
            self.log_filter.as_deref(),
        )
    }

    /// Ready-to-install filter for these arguments.
    pub fn filter(&self) -> EnvFilter {
        env_filter_from_spec(&self.spec())
    }
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &["session_coordinator", "session_replay", "logging"]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|t| format!("{t}={lvl}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info"))
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_spec_covers_every_crate() {
        let spec = level_spec_for("DEBUG");
        assert_eq!(
            spec,
            "session_coordinator=debug,session_replay=debug,logging=debug"
        );
    }

    #[test]
    fn explicit_filter_wins() {
        let spec = compute_spec(true, false, Some("warn"), Some("session_coordinator=trace"));
        assert_eq!(spec, "session_coordinator=trace");
    }

    #[test]
    fn trace_beats_level() {
        assert_eq!(compute_spec(true, false, Some("warn"), None), level_spec_for("trace"));
        assert_eq!(compute_spec(false, true, Some("warn"), None), level_spec_for("debug"));
        assert_eq!(compute_spec(false, false, Some("warn"), None), level_spec_for("warn"));
    }

    #[test]
    fn args_render_level_in_lowercase() {
        let args = LogArgs {
            log_level: Some(Level::WARN),
            ..LogArgs::default()
        };
        assert_eq!(args.spec(), level_spec_for("warn"));
    }
}
