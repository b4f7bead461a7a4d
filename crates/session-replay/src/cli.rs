//! Command-line interface definitions for session-replay.

use std::path::PathBuf;

use clap::Parser;
use logging::LogArgs;

/// Command-line interface for the `session-replay` binary.
#[derive(Parser, Debug)]
#[command(
    name = "session-replay",
    about = "Replay a scripted desktop session through the coordinator",
    version
)]
pub struct Cli {
    /// Logging controls shared across workspace binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Scenario file (RON) describing the desktop and the event script.
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Print final lane counters after the effect log.
    #[arg(long)]
    pub stats: bool,
}
