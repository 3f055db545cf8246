// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mr master` - start the coordinating process of a distributed job.
//!
//! The master is the embedded-driver process: it binds the HTTP listener
//! real workers sign into, runs the scheduler, and drives `run_fn` to
//! completion on its own dedicated thread (see `mr_driver::run`). Workers
//! are the only role that ever runs as a separate process.

use mr_core::Registry;
use mr_driver::Job;
use mr_master::{MasterConfig, SchedulerConfigArgs};

use crate::args::SharedArgs;
use crate::error::CliError;

pub async fn run<F>(
    shared: SharedArgs,
    registry: Registry,
    default_partition: &str,
    run_fn: F,
) -> Result<(), CliError>
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    let master_config = MasterConfig {
        scheduler: SchedulerConfigArgs { max_task_retries: shared.max_task_retries() },
        ..MasterConfig::default().listen_addr(shared.listen_addr(7070)).rpc_timeout(shared.rpc_timeout())
    };

    mr_driver::run(master_config, registry, default_partition, shared.reduce_tasks(), run_fn)
        .await
        .map_err(CliError::Driver)
}
