#![warn(missing_docs)]

//! Entry point for the `session-replay` binary.
//!
//! Loads a scenario, drives it through a live coordinator backed by the
//! in-memory desktop model, and prints every side effect in order.

mod cli;
mod error;
mod replay;
mod scenario;

use std::{io, process};

use clap::Parser;
use tokio::runtime;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{cli::Cli, error::Result, scenario::Scenario};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and replay the scenario.
fn run() -> Result<()> {
    let Cli {
        log,
        scenario,
        stats,
    } = Cli::parse();
    registry()
        .with(log.filter())
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    let scenario = Scenario::load(&scenario)?;
    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    let outcome = rt.block_on(replay::play(&scenario))?;

    for (i, effect) in outcome.effects.iter().enumerate() {
        println!("{:>3}  {}", i + 1, replay::describe(effect));
    }
    if stats {
        println!("{:?}", outcome.stats);
    }
    Ok(())
}
