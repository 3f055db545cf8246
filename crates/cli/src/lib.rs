// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mr-cli: the argv-driven entry point shared by every driver program.
//!
//! A driver program builds its [`mr_core::Registry`] and its `run` closure,
//! then calls [`main`] from its own `fn main`. Depending on the subcommand
//! the user invoked, that either starts this process as the embedded-driver
//! master, starts it as a worker, or runs the whole job in this one process
//! (`run serial` / `run mockparallel`) without calling `run_fn` more than
//! once and without ever calling it at all for `master`/`worker`.

mod args;
pub mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use mr_core::Registry;
use mr_driver::Job;
use tracing::error;

pub use args::{Cli, Command, RunMode, SharedArgs};
pub use error::CliError;

/// Parses `std::env::args`, installs the global tracing subscriber, and
/// dispatches to the requested role. `run_fn` is only ever invoked for
/// `mr master`, `mr run serial`, and `mr run mockparallel`.
pub fn main<F>(registry: Registry, default_partition: &str, run_fn: F) -> ExitCode
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    logging::init();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            error!(%err, "failed to start the tokio runtime");
            return ExitCode::from(1);
        }
    };

    let result = runtime.block_on(dispatch(cli.command, registry, default_partition, run_fn));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "mr exited with an error");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

async fn dispatch<F>(
    command: Command,
    registry: Registry,
    default_partition: &str,
    run_fn: F,
) -> Result<(), CliError>
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    match command {
        Command::Master(shared) => commands::master::run(shared, registry, default_partition, run_fn).await,
        Command::Worker(shared) => commands::worker::run(shared, registry).await,
        Command::Run { mode: RunMode::Serial(shared) } => {
            commands::run::serial(shared, registry, default_partition, run_fn).await
        }
        Command::Run { mode: RunMode::Mockparallel { shared, workers } } => {
            commands::run::mockparallel(shared, workers, registry, default_partition, run_fn).await
        }
    }
}
