// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The driver-side data manager: the async half of the bridge to the
//! embedded scheduler. Runs as its own Tokio task, translating
//! [`DriverEvent`]s into the state [`crate::job::Job::wait`] and
//! [`crate::job::Job::progress`] read synchronously from the user's run
//! thread.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use mr_core::DatasetId;
use mr_scheduler::DriverEvent;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tracing::warn;

/// Tracks how much of a computing dataset's input has been consumed, per the
/// highest task-index whose output has been observed so far.
struct DatasetStatus {
    max_source_seen: Option<u32>,
    total_sources: u32,
}

impl DatasetStatus {
    fn note_source(&mut self, source: u32) {
        self.max_source_seen = Some(self.max_source_seen.map_or(source, |m| m.max(source)));
    }

    fn progress(&self) -> f64 {
        if self.total_sources == 0 {
            return 1.0;
        }
        match self.max_source_seen {
            Some(seen) => (seen as f64 + 1.0) / self.total_sources as f64,
            None => 0.0,
        }
    }
}

/// Shared state read by [`crate::job::Job`] (from the user's run thread) and
/// written by [`run`] (on the Tokio runtime).
pub struct ManagerState {
    computing: Mutex<HashSet<DatasetId>>,
    status: Mutex<HashMap<DatasetId, DatasetStatus>>,
    notify: Notify,
}

impl ManagerState {
    pub fn new() -> Self {
        Self {
            computing: Mutex::new(HashSet::new()),
            status: Mutex::new(HashMap::new()),
            notify: Notify::new(),
        }
    }

    /// Called when a `ComputedData` dataset is submitted, before the submit
    /// command is sent, so no event can race ahead of this bookkeeping.
    pub fn track_computing(&self, id: DatasetId, total_sources: u32) {
        self.computing.lock().insert(id);
        self.status.lock().insert(id, DatasetStatus { max_source_seen: None, total_sources });
    }

    pub fn is_computing(&self, id: DatasetId) -> bool {
        self.computing.lock().contains(&id)
    }

    pub fn progress(&self, id: DatasetId) -> f64 {
        self.status.lock().get(&id).map(DatasetStatus::progress).unwrap_or(1.0)
    }

    /// Returns a `Notified` future the caller must create *before* checking
    /// whether it still needs to wait, so a notification between the check
    /// and the await is never missed.
    pub fn notified(&self) -> tokio::sync::futures::Notified<'_> {
        self.notify.notified()
    }
}

impl Default for ManagerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains scheduler events onto `state` until the channel closes (the master
/// task exited) or the driver run finishes and the event stream is dropped.
pub async fn run(state: Arc<ManagerState>, mut events_rx: mpsc::UnboundedReceiver<DriverEvent>) {
    while let Some(event) = events_rx.recv().await {
        match event {
            DriverEvent::BucketReady { dataset_id, bucket } => {
                if let Some(status) = state.status.lock().get_mut(&dataset_id) {
                    status.note_source(bucket.source);
                }
            }
            DriverEvent::DatasetComputed { dataset_id, .. } => {
                state.status.lock().remove(&dataset_id);
                state.computing.lock().remove(&dataset_id);
                state.notify.notify_waiters();
            }
            DriverEvent::JobFailed { dataset_id, reason } => {
                warn!(dataset = %dataset_id, %reason, "dataset failed, unblocking waiters");
                state.status.lock().remove(&dataset_id);
                state.computing.lock().remove(&dataset_id);
                state.notify.notify_waiters();
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
