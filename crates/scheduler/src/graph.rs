// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory dataset DAG: submission, dependency tracking, close/remove.

use std::collections::{HashMap, HashSet};

use mr_core::{Dataset, DatasetId, DatasetKind};
use tracing::debug;

use crate::error::SchedulerError;

/// Owns every dataset in the current job and the edges between them.
///
/// Invariant: a dataset is removed only once it is closed and has no
/// remaining dependents; this is enforced by [`DatasetGraph::try_remove`]
/// rather than by any external caller.
#[derive(Default)]
pub struct DatasetGraph {
    datasets: HashMap<DatasetId, Dataset>,
    /// input_id -> set of dataset ids that depend on it.
    dependents: HashMap<DatasetId, HashSet<DatasetId>>,
    close_requests: HashSet<DatasetId>,
    computing: HashSet<DatasetId>,
}

impl DatasetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: DatasetId) -> Option<&Dataset> {
        self.datasets.get(&id)
    }

    pub fn get_mut(&mut self, id: DatasetId) -> Option<&mut Dataset> {
        self.datasets.get_mut(&id)
    }

    pub fn is_computing(&self, id: DatasetId) -> bool {
        self.computing.contains(&id)
    }

    pub fn input_of(&self, id: DatasetId) -> Option<DatasetId> {
        self.datasets
            .get(&id)
            .and_then(|d| d.as_computed())
            .map(|c| c.input_id)
    }

    /// Insert a new dataset into the graph and record its dependency edge.
    pub fn submit(&mut self, dataset: Dataset) -> Result<(), SchedulerError> {
        let id = dataset.id;
        if self.datasets.contains_key(&id) {
            return Err(SchedulerError::DuplicateDataset(id));
        }
        if let DatasetKind::Computed(computed) = &dataset.kind {
            if !self.datasets.contains_key(&computed.input_id) {
                return Err(SchedulerError::MissingInput(id));
            }
            self.dependents.entry(computed.input_id).or_default().insert(id);
            self.computing.insert(id);
        }
        debug!(dataset = %id, "dataset submitted");
        self.datasets.insert(id, dataset);
        Ok(())
    }

    /// Record the driver's intent to close `id`; honored immediately if
    /// possible, otherwise deferred until `on_dataset_done`/removal chains
    /// catch up.
    pub fn close(&mut self, id: DatasetId) {
        self.close_requests.insert(id);
        self.try_close(id);
        self.try_remove(id);
    }

    /// Mark `id` no longer computing; propagate close/remove to it and to
    /// its input.
    pub fn on_dataset_done(&mut self, id: DatasetId) {
        self.computing.remove(&id);
        let input = self.input_of(id);
        self.try_close(id);
        self.try_remove(id);
        if let Some(input_id) = input {
            self.try_close(input_id);
            self.try_remove(input_id);
        }
    }

    /// Closing only sets `closed = true`; no files are deleted here.
    pub fn try_close(&mut self, id: DatasetId) -> bool {
        if !self.close_requests.contains(&id) {
            return false;
        }
        if self.computing.contains(&id) {
            return false;
        }
        if self.has_computing_dependent(id) {
            return false;
        }
        let Some(dataset) = self.datasets.get_mut(&id) else {
            return false;
        };
        if dataset.closed {
            return true;
        }
        dataset.closed = true;
        debug!(dataset = %id, "dataset closed");
        true
    }

    fn has_computing_dependent(&self, id: DatasetId) -> bool {
        self.dependents
            .get(&id)
            .map(|deps| deps.iter().any(|d| self.computing.contains(d)))
            .unwrap_or(false)
    }

    /// Remove `id` from the graph if closed and dependent-free. Non-permanent
    /// datasets are expected to have their backing files deleted by the
    /// caller using the returned dataset before it is dropped.
    pub fn try_remove(&mut self, id: DatasetId) -> Option<Dataset> {
        let dataset = self.datasets.get(&id)?;
        if !dataset.closed {
            return None;
        }
        let has_dependents = self.dependents.get(&id).map(|s| !s.is_empty()).unwrap_or(false);
        if has_dependents {
            return None;
        }
        let removed = self.datasets.remove(&id)?;
        self.close_requests.remove(&id);
        self.dependents.remove(&id);
        if let Some(input_id) = removed.as_computed().map(|c| c.input_id) {
            if let Some(deps) = self.dependents.get_mut(&input_id) {
                deps.remove(&id);
            }
            // Removing a dependent may unblock the parent's own close/remove.
            self.try_close(input_id);
            self.try_remove(input_id);
        }
        debug!(dataset = %id, "dataset removed");
        Some(removed)
    }

    pub fn is_closed(&self, id: DatasetId) -> bool {
        self.datasets.get(&id).map(|d| d.closed).unwrap_or(false)
    }

    /// True once the driver has asked to close `id`, even if the dataset
    /// itself can't actually close yet because it (or a dependent) is still
    /// computing.
    pub fn has_close_request(&self, id: DatasetId) -> bool {
        self.close_requests.contains(&id)
    }

    pub fn contains(&self, id: DatasetId) -> bool {
        self.datasets.contains_key(&id)
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
