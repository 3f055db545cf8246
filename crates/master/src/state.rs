// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state handed to every axum handler, following the
//! listener-context pattern: one struct, cheap to clone, internally locked.

use std::sync::Arc;

use mr_core::Clock;
use mr_scheduler::{DriverEvent, Runtime};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::config::MasterConfig;
use crate::worker_registry::WorkerRegistry;

/// Context shared across the axum router and the background dispatch and
/// heartbeat tasks. Cheap to clone: every field is an `Arc`.
#[derive(Clone)]
pub struct MasterState<C: Clock> {
    pub runtime: Arc<Mutex<Runtime>>,
    pub workers: Arc<Mutex<WorkerRegistry<C>>>,
    pub driver_tx: mpsc::UnboundedSender<DriverEvent>,
    pub http: reqwest::Client,
    pub config: Arc<MasterConfig>,
}

impl<C: Clock> MasterState<C> {
    pub fn new(
        config: MasterConfig,
        clock: C,
        driver_tx: mpsc::UnboundedSender<DriverEvent>,
    ) -> Self {
        let scheduler_config = config.scheduler_config();
        Self {
            runtime: Arc::new(Mutex::new(Runtime::new(scheduler_config))),
            workers: Arc::new(Mutex::new(WorkerRegistry::new(clock))),
            driver_tx,
            http: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }

    /// Forward every event the scheduler accumulated to the driver.
    pub fn flush_events(&self) {
        let events = self.runtime.lock().drain_events();
        for event in events {
            let _ = self.driver_tx.send(event);
        }
    }
}
