// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the embedded master, the driver-side data manager, and the user's
//! `run` function together in a single process (see the crate's module doc).

use std::path::PathBuf;
use std::sync::Arc;

use mr_core::{env, Registry};
use mr_master::MasterConfig;
use mr_scheduler::DriverCommand;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::DriverError;
use crate::job::Job;
use crate::manager::{self, ManagerState};

/// Runs `run_fn` as the driver of one job.
///
/// Spawns the embedded master on the current Tokio runtime, spawns the data
/// manager task that bridges scheduler events back to the [`Job`], then runs
/// `run_fn` on a dedicated OS thread so the user's blocking `wait` calls
/// never stall the runtime. Returns once `run_fn` returns; the boolean it
/// returns becomes `Ok(())` or [`DriverError::RunFailed`].
pub async fn run<F>(
    master_config: MasterConfig,
    registry: Registry,
    default_partition: &str,
    default_reduce_tasks: u32,
    run_fn: F,
) -> Result<(), DriverError>
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    let manager_state = Arc::new(ManagerState::new());
    let manager_task = tokio::spawn(manager::run(manager_state.clone(), event_rx));

    let master_addr = master_config.listen_addr;
    let master_task = tokio::spawn(mr_master::run(master_config, event_tx, cmd_rx));

    let job = Job::new(
        cmd_tx.clone(),
        manager_state,
        Arc::new(registry),
        master_addr,
        PathBuf::from(env::state_dir()),
        default_partition,
        default_reduce_tasks,
        tokio::runtime::Handle::current(),
    );

    let success = tokio::task::spawn_blocking(move || run_on_dedicated_thread(job, cmd_tx, run_fn))
        .await
        .unwrap_or(false);

    manager_task.abort();
    master_task.abort();

    if success {
        info!("driver run function completed successfully");
        Ok(())
    } else {
        error!("driver run function failed");
        Err(DriverError::RunFailed)
    }
}

/// Spawns the actual user-code thread and blocks the calling (blocking-pool)
/// thread on its join, keeping a dedicated user thread free to block on
/// `wait` without ever stalling one of the runtime's worker threads.
fn run_on_dedicated_thread<F>(job: Job, cmd_tx: mpsc::UnboundedSender<DriverCommand>, run_fn: F) -> bool
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    let handle = match std::thread::Builder::new().name("driver-run".into()).spawn(move || {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run_fn(job))).unwrap_or(false)
    }) {
        Ok(handle) => handle,
        Err(err) => {
            error!(%err, "failed to spawn the driver run thread");
            return false;
        }
    };
    let success = handle.join().unwrap_or(false);
    let _ = cmd_tx.send(DriverCommand::JobDone(success));
    success
}
