// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task scheduler: turns runnable datasets into dispatchable tasks and
//! reacts to completion/loss, driving the [`DatasetGraph`] forward.

use std::collections::{HashMap, HashSet, VecDeque};

use mr_core::{Dataset, DatasetId, DatasetKind};
use tracing::{info, warn};

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::events::DriverEvent;
use crate::graph::DatasetGraph;
use crate::tasklist::TaskList;

/// Owns the dataset graph and per-dataset task bookkeeping for one job.
///
/// Single-threaded by design (see the module-level crate doc): callers are
/// expected to serialize access, typically by running `Runtime` inside a
/// single Tokio task that owns an mpsc receiver.
pub struct Runtime {
    graph: DatasetGraph,
    tasklists: HashMap<DatasetId, TaskList>,
    pending: HashSet<DatasetId>,
    runnable: VecDeque<DatasetId>,
    retries: HashMap<(DatasetId, u32), u32>,
    config: SchedulerConfig,
    events: Vec<DriverEvent>,
}

impl Runtime {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            graph: DatasetGraph::new(),
            tasklists: HashMap::new(),
            pending: HashSet::new(),
            runnable: VecDeque::new(),
            retries: HashMap::new(),
            config,
            events: Vec::new(),
        }
    }

    pub fn graph(&self) -> &DatasetGraph {
        &self.graph
    }

    /// Drain events accumulated since the last call; the caller forwards
    /// these to the driver-side data manager.
    pub fn drain_events(&mut self) -> Vec<DriverEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn submit(&mut self, dataset: Dataset) -> Result<(), SchedulerError> {
        let id = dataset.id;
        let is_computed = matches!(dataset.kind, DatasetKind::Computed(_));
        let input_done = dataset
            .as_computed()
            .map(|c| !self.graph.is_computing(c.input_id))
            .unwrap_or(true);
        self.graph.submit(dataset)?;

        if is_computed {
            if input_done {
                self.make_runnable(id);
            } else {
                self.pending.insert(id);
            }
        } else {
            // FileData/LocalData never compute; they're immediately done.
            self.graph.on_dataset_done(id);
        }
        Ok(())
    }

    pub fn close(&mut self, id: DatasetId) {
        self.graph.close(id);
    }

    fn make_runnable(&mut self, id: DatasetId) {
        self.pending.remove(&id);
        self.runnable.push_back(id);
        let Some(dataset) = self.graph.get(id) else { return };
        let Some(computed) = dataset.as_computed() else { return };
        let input_id = computed.input_id;
        let ntasks = computed.ntasks;
        let Some(input) = self.graph.get(input_id) else { return };
        let tasklist = TaskList::make_tasks(input, ntasks);
        if tasklist.is_complete() {
            // Every input column was empty; the dataset is done with zero tasks.
            self.tasklists.insert(id, tasklist);
            self.complete_dataset(id);
        } else {
            self.tasklists.insert(id, tasklist);
        }
    }

    /// Pop the next dispatchable `(dataset_id, task_index)`, in FIFO order
    /// within a dataset and in the order datasets became runnable across
    /// datasets.
    pub fn next_task(&mut self) -> Option<(DatasetId, u32)> {
        for _ in 0..self.runnable.len() {
            let id = self.runnable.pop_front()?;
            let done = {
                let Some(tl) = self.tasklists.get_mut(&id) else {
                    continue;
                };
                if let Some(task_index) = tl.pop_ready() {
                    self.runnable.push_back(id);
                    return Some((id, task_index));
                }
                tl.is_complete()
            };
            if !done {
                self.runnable.push_back(id);
            }
        }
        None
    }

    /// A task reported completion with its output bucket URLs.
    pub fn task_done(&mut self, id: DatasetId, task_index: u32, outputs: Vec<(u32, String)>) {
        if !self.graph.contains(id) {
            return;
        }
        let close_requested = self.graph.has_close_request(id);
        let bucket_events: Vec<DriverEvent> = {
            let Some(dataset) = self.graph.get_mut(id) else { return };
            if dataset.as_computed().is_none() {
                return;
            }
            let source = task_index;
            outputs
                .into_iter()
                .map(|(split, url)| {
                    dataset.bucket_mut(source, split).mark_ready(url.clone(), "");
                    DriverEvent::BucketReady {
                        dataset_id: id,
                        bucket: dataset.bucket(source, split).clone(),
                    }
                })
                .collect()
        };
        if !close_requested {
            self.events.extend(bucket_events);
        }

        let Some(tl) = self.tasklists.get_mut(&id) else { return };
        tl.mark_done(task_index);
        self.retries.remove(&(id, task_index));
        if tl.is_complete() {
            self.complete_dataset(id);
        }
    }

    /// A task's worker was lost; re-queue immediately unless the dataset was
    /// closed or removed out from under it, and bound retries per task.
    pub fn task_lost(&mut self, id: DatasetId, task_index: u32) -> Result<(), SchedulerError> {
        if !self.graph.contains(id) {
            return Ok(());
        }
        let retry_count = self.retries.entry((id, task_index)).or_insert(0);
        *retry_count += 1;
        if *retry_count > self.config.max_task_retries {
            warn!(dataset = %id, task_index, retries = *retry_count, "task exceeded retry limit");
            self.events.push(DriverEvent::JobFailed {
                dataset_id: id,
                reason: format!("task {task_index} exceeded {} retries", self.config.max_task_retries),
            });
            return Err(SchedulerError::TaskRetriesExhausted {
                dataset: id,
                task_index,
                limit: self.config.max_task_retries,
            });
        }
        if let Some(tl) = self.tasklists.get_mut(&id) {
            tl.requeue_front(task_index);
        }
        Ok(())
    }

    fn complete_dataset(&mut self, id: DatasetId) {
        let fetched = self.graph.get(id).and_then(|d| d.as_computed()).map(|c| c.fetched).unwrap_or(false);
        info!(dataset = %id, "dataset computed");
        self.events.push(DriverEvent::DatasetComputed { dataset_id: id, fetched });
        self.graph.on_dataset_done(id);
        self.wakeup_dependents(id);
    }

    /// A dependent becomes runnable only once its input's tasks are all done
    /// and the input has not been removed out from under it.
    fn wakeup_dependents(&mut self, completed_input: DatasetId) {
        let waiting: Vec<DatasetId> = self
            .pending
            .iter()
            .copied()
            .filter(|id| self.graph.input_of(*id) == Some(completed_input))
            .collect();
        for id in waiting {
            // A dependent holds an edge into `dependents`, so the graph
            // refuses to remove its input while it is still pending.
            if self.graph.contains(id) {
                self.make_runnable(id);
            }
        }
    }

    pub fn percent_complete(&self, id: DatasetId) -> Option<f64> {
        let dataset = self.graph.get(id)?;
        let ntasks = dataset.as_computed()?.ntasks;
        self.tasklists.get(&id).map(|tl| tl.percent_complete(ntasks))
    }

    pub fn task_descriptor_inputs(&self, id: DatasetId, task_index: u32) -> Option<Vec<Option<String>>> {
        let dataset = self.graph.get(id)?;
        let computed = dataset.as_computed()?;
        let input = self.graph.get(computed.input_id)?;
        Some(
            input
                .column(task_index)
                .map(|b| b.url.as_ref().map(|s| s.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
