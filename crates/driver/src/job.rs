// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The programmatic surface handed to the user's `run` function: defines
//! datasets, submits them to the embedded scheduler, and blocks on their
//! completion.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mr_core::{
    BucketFormat, ComputedData, Dataset, DatasetId, DatasetKind, Operation, Registry,
};
use mr_scheduler::DriverCommand;
use smol_str::SmolStr;
use tokio::sync::mpsc;

use crate::error::DriverError;
use crate::manager::ManagerState;

type Pair = (Vec<u8>, Vec<u8>);

/// Handed to the user's `run` function by [`crate::run`]. Every method that
/// submits a dataset returns as soon as the submission is queued; the
/// dataset's buckets become ready asynchronously except for `file_data` and
/// `local_data`, whose buckets are ready immediately.
#[derive(Clone)]
pub struct Job {
    cmd_tx: mpsc::UnboundedSender<DriverCommand>,
    manager: Arc<ManagerState>,
    registry: Arc<Registry>,
    master_addr: std::net::SocketAddr,
    state_dir: PathBuf,
    default_partition: SmolStr,
    default_reduce_tasks: u32,
    /// Handle to the runtime the scheduler/manager tasks run on, so `wait`
    /// can block this (plain OS) thread on the async `Notify` without
    /// needing a runtime context of its own.
    runtime: tokio::runtime::Handle,
}

impl Job {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        cmd_tx: mpsc::UnboundedSender<DriverCommand>,
        manager: Arc<ManagerState>,
        registry: Arc<Registry>,
        master_addr: std::net::SocketAddr,
        state_dir: PathBuf,
        default_partition: impl Into<SmolStr>,
        default_reduce_tasks: u32,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            cmd_tx,
            manager,
            registry,
            master_addr,
            state_dir,
            default_partition: default_partition.into(),
            default_reduce_tasks,
            runtime,
        }
    }

    fn submit(&self, dataset: Dataset) -> Result<(), DriverError> {
        self.cmd_tx.send(DriverCommand::Submit(dataset)).map_err(|_| DriverError::Closed)
    }

    /// Defines a set of data from a list of already-reachable URLs. One
    /// split per URL, buckets are ready immediately, nothing is computed.
    pub fn file_data(
        &self,
        urls: impl IntoIterator<Item = impl Into<SmolStr>>,
        format: Option<BucketFormat>,
    ) -> Result<Dataset, DriverError> {
        let urls: Vec<SmolStr> = urls.into_iter().map(Into::into).collect();
        let format = format.unwrap_or_default();
        let id = DatasetId::new();
        let mut ds = Dataset::new(id, 1, urls.len() as u32, DatasetKind::FileData);
        for (split, url) in urls.into_iter().enumerate() {
            let bucket = ds.bucket_mut(0, split as u32);
            bucket.format = format;
            bucket.mark_ready(url, "");
        }
        self.submit(ds.clone())?;
        Ok(ds)
    }

    /// Defines a set of data built locally from an in-memory iterator of
    /// key/value pairs, partitioned and written to disk synchronously before
    /// this call returns.
    pub fn local_data(
        &self,
        pairs: impl IntoIterator<Item = Pair>,
        splits: Option<u32>,
        partitioner: Option<&str>,
        format: Option<BucketFormat>,
    ) -> Result<Dataset, DriverError> {
        let splits = splits.unwrap_or(self.default_reduce_tasks).max(1);
        let partitioner = partitioner.unwrap_or(self.default_partition.as_str());
        let part_fn = self
            .registry
            .partitioner(partitioner)
            .ok_or_else(|| DriverError::UnknownPartitioner(partitioner.into()))?;
        let format = format.unwrap_or_default();

        let mut columns: Vec<Vec<Pair>> = (0..splits).map(|_| Vec::new()).collect();
        for (key, value) in pairs {
            let split = part_fn(&key, splits) as usize % columns.len();
            columns[split].push((key, value));
        }

        let id = DatasetId::new();
        let mut ds = Dataset::new(id, 1, splits, DatasetKind::LocalData);
        let dir = self.state_dir.join(id.as_str());
        std::fs::create_dir_all(&dir)?;
        for (split, column) in columns.into_iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            let filename = ds.bucket_path(0, split as u32, format.extension());
            let bytes = mr_wire::encode_pairs(format, &column);
            std::fs::write(dir.join(&filename), &bytes)?;
            let url = format!("http://{}/buckets/{id}/{filename}", self.master_addr);
            let bucket = ds.bucket_mut(0, split as u32);
            bucket.format = format;
            bucket.mark_ready(url, filename);
        }
        ds.permanent = true;
        self.submit(ds.clone())?;
        Ok(ds)
    }

    /// Defines a set of data computed by running a mapper over `input`.
    pub fn map_data(
        &self,
        input: &Dataset,
        mapper: &str,
        splits: Option<u32>,
        partitioner: Option<&str>,
    ) -> Result<Dataset, DriverError> {
        let partitioner = partitioner.unwrap_or(self.default_partition.as_str());
        self.registry.has_mapper(mapper).then_some(()).ok_or_else(|| DriverError::UnknownMapper(mapper.into()))?;
        self.registry
            .has_partitioner(partitioner)
            .then_some(())
            .ok_or_else(|| DriverError::UnknownPartitioner(partitioner.into()))?;
        let op = Operation::Map { mapper: mapper.into(), partitioner: partitioner.into() };
        self.submit_computed(input, op, splits.unwrap_or(self.default_reduce_tasks).max(1))
    }

    /// Defines a set of data computed by running a reducer over `input`,
    /// grouped by key. Defaults to a single output split, matching the
    /// common case of collapsing shuffled data down to one result set.
    pub fn reduce_data(
        &self,
        input: &Dataset,
        reducer: &str,
        splits: Option<u32>,
    ) -> Result<Dataset, DriverError> {
        self.registry.has_reducer(reducer).then_some(()).ok_or_else(|| DriverError::UnknownReducer(reducer.into()))?;
        let op = Operation::Reduce { reducer: reducer.into() };
        self.submit_computed(input, op, splits.unwrap_or(1).max(1))
    }

    /// Defines a set of data computed by reducing `input` by key and then
    /// mapping each reduced group, partitioning the mapper's output.
    pub fn reducemap_data(
        &self,
        input: &Dataset,
        reducer: &str,
        mapper: &str,
        splits: Option<u32>,
        partitioner: Option<&str>,
    ) -> Result<Dataset, DriverError> {
        let partitioner = partitioner.unwrap_or(self.default_partition.as_str());
        self.registry.has_reducer(reducer).then_some(()).ok_or_else(|| DriverError::UnknownReducer(reducer.into()))?;
        self.registry.has_mapper(mapper).then_some(()).ok_or_else(|| DriverError::UnknownMapper(mapper.into()))?;
        self.registry
            .has_partitioner(partitioner)
            .then_some(())
            .ok_or_else(|| DriverError::UnknownPartitioner(partitioner.into()))?;
        let op = Operation::ReduceMap { reducer: reducer.into(), mapper: mapper.into(), partitioner: partitioner.into() };
        self.submit_computed(input, op, splits.unwrap_or(self.default_reduce_tasks).max(1))
    }

    fn submit_computed(&self, input: &Dataset, op: Operation, splits: u32) -> Result<Dataset, DriverError> {
        let id = DatasetId::new();
        let ntasks = input.splits;
        let computed = ComputedData { input_id: input.id, ntasks, op, computing: true, fetched: false };
        let ds = Dataset::new(id, ntasks, splits, DatasetKind::Computed(computed));
        self.manager.track_computing(id, ntasks);
        self.submit(ds.clone())?;
        Ok(ds)
    }

    /// Records the driver's intent to close `dataset`; honored by the
    /// scheduler once it and its dependents are no longer computing.
    pub fn close(&self, dataset: &Dataset) -> Result<(), DriverError> {
        self.cmd_tx.send(DriverCommand::Close(dataset.id)).map_err(|_| DriverError::Closed)
    }

    /// Blocks until at least one of `datasets` is no longer computing, or
    /// until `timeout` elapses. Returns the ids that are ready. Datasets
    /// that were never computing (`FileData`/`LocalData`) are always ready.
    pub fn wait(&self, datasets: &[&Dataset], timeout: Option<Duration>) -> Vec<DatasetId> {
        let ids: Vec<DatasetId> = datasets.iter().map(|d| d.id).collect();
        let check = || -> Vec<DatasetId> {
            ids.iter().copied().filter(|id| !self.manager.is_computing(*id)).collect()
        };

        let notified = self.manager.notified();
        let ready = check();
        if !ready.is_empty() {
            return ready;
        }

        self.runtime.block_on(async {
            match timeout {
                Some(timeout) => {
                    let _ = tokio::time::timeout(timeout, notified).await;
                }
                None => notified.await,
            }
        });
        check()
    }

    /// Portion of `dataset` complete, in `[0, 1]`. Datasets not currently
    /// tracked as computing (including ones not yet or no longer computing)
    /// report `1.0`.
    pub fn progress(&self, dataset: &Dataset) -> f64 {
        self.manager.progress(dataset.id)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
