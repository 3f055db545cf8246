// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashSet;
use std::sync::Arc;

use mr_core::{DatasetId, Registry, WorkerId};
use parking_lot::Mutex;
use smol_str::SmolStr;

use crate::config::WorkerConfig;

/// Shared state handed to every axum handler on this worker, following the
/// same listener-context pattern as the master.
#[derive(Clone)]
pub struct WorkerState {
    pub config: Arc<WorkerConfig>,
    pub registry: Arc<Registry>,
    pub http: reqwest::Client,
    pub cookie: SmolStr,
    pub worker_id: Arc<Mutex<Option<WorkerId>>>,
    /// Tasks withdrawn by a `cancel` call before they finished; their
    /// completion is reported to nobody.
    pub cancelled: Arc<Mutex<HashSet<(DatasetId, u32)>>>,
}

impl WorkerState {
    pub fn new(config: WorkerConfig, registry: Registry) -> Self {
        let cookie: SmolStr = format!("wkr-{}", nanoid::nanoid!(16)).into();
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            http: reqwest::Client::new(),
            cookie,
            worker_id: Arc::new(Mutex::new(None)),
            cancelled: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn worker_id(&self) -> Option<WorkerId> {
        self.worker_id.lock().clone()
    }

    pub fn is_cancelled(&self, dataset_id: DatasetId, task_index: u32) -> bool {
        self.cancelled.lock().remove(&(dataset_id, task_index))
    }
}
