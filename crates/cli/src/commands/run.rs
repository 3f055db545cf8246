// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mr run serial` / `mr run mockparallel` - run a job without any separate
//! worker processes: the master, the driver, and one or more workers all
//! live in this one process, the workers reached over loopback HTTP same
//! as real ones would be. `serial` is `mockparallel` with exactly one
//! worker: a single dedicated worker versus several simulated ones.

use std::net::SocketAddr;

use mr_core::Registry;
use mr_driver::Job;
use mr_master::{MasterConfig, SchedulerConfigArgs};
use mr_worker::WorkerConfig;
use tracing::{info, warn};

use crate::args::SharedArgs;
use crate::error::CliError;

pub async fn serial<F>(shared: SharedArgs, registry: Registry, default_partition: &str, run_fn: F) -> Result<(), CliError>
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    local(shared, 1, registry, default_partition, run_fn).await
}

pub async fn mockparallel<F>(
    shared: SharedArgs,
    workers: u32,
    registry: Registry,
    default_partition: &str,
    run_fn: F,
) -> Result<(), CliError>
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    local(shared, workers.max(1), registry, default_partition, run_fn).await
}

async fn local<F>(
    shared: SharedArgs,
    n_workers: u32,
    registry: Registry,
    default_partition: &str,
    run_fn: F,
) -> Result<(), CliError>
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    let master_addr = shared.listen_addr(7070);
    let master_config = MasterConfig {
        scheduler: SchedulerConfigArgs { max_task_retries: shared.max_task_retries() },
        ..MasterConfig::default().listen_addr(master_addr).rpc_timeout(shared.rpc_timeout())
    };

    let worker_handles: Vec<_> = (0..n_workers)
        .map(|i| {
            let worker_addr = SocketAddr::new(master_addr.ip(), master_addr.port() + 1 + i as u16);
            let worker_config = WorkerConfig::new(format!("http://{master_addr}"), worker_addr)
                .rpc_timeout(shared.rpc_timeout());
            let worker_registry = registry.clone();
            info!(worker = i, %worker_addr, "starting in-process worker");
            tokio::spawn(async move {
                if let Err(err) = mr_worker::run(worker_config, worker_registry).await {
                    warn!(worker = i, %err, "in-process worker exited with an error");
                }
            })
        })
        .collect();

    let run_fn = maybe_profiled(shared.profile, run_fn);
    let result =
        mr_driver::run(master_config, registry, default_partition, shared.reduce_tasks(), run_fn).await;

    for handle in worker_handles {
        handle.abort();
    }

    result.map_err(CliError::Driver)?;

    if !shared.keep_jobdir {
        cleanup(&shared.shared_dir())?;
    }
    Ok(())
}

fn maybe_profiled<F>(profile: bool, run_fn: F) -> Box<dyn FnOnce(Job) -> bool + Send>
where
    F: FnOnce(Job) -> bool + Send + 'static,
{
    if !profile {
        return Box::new(run_fn);
    }
    Box::new(move |job| {
        let start = std::time::Instant::now();
        let success = run_fn(job);
        info!(elapsed_ms = start.elapsed().as_millis() as u64, success, "run function finished");
        success
    })
}

fn cleanup(shared_dir: &std::path::Path) -> Result<(), CliError> {
    match std::fs::remove_dir_all(shared_dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(CliError::Cleanup(shared_dir.to_path_buf(), err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_an_existing_shared_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("dataset_abc");
        std::fs::create_dir_all(&nested).expect("create_dir_all");
        std::fs::write(nested.join("split_0"), b"hello").expect("write");

        cleanup(dir.path()).expect("cleanup should succeed");
        assert!(!dir.path().exists());
    }

    #[test]
    fn cleanup_is_a_no_op_when_the_shared_dir_never_existed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("never-created");
        cleanup(&missing).expect("missing dir should not be an error");
    }
}
