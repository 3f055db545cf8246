// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applies commands the driver sends (submit/close/job-done) to the
//! scheduler `Runtime`, flushing resulting events back out on every step.
//! This is the in-process counterpart of `dispatch`/`heartbeat`, which talk
//! to workers instead of the driver.

use mr_core::Clock;
use mr_scheduler::DriverCommand;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::state::MasterState;

pub async fn run<C: Clock + 'static>(state: MasterState<C>, mut driver_rx: mpsc::UnboundedReceiver<DriverCommand>) {
    while let Some(cmd) = driver_rx.recv().await {
        match cmd {
            DriverCommand::Submit(dataset) => {
                let id = dataset.id;
                if let Err(err) = state.runtime.lock().submit(dataset) {
                    warn!(dataset = %id, %err, "driver submitted an invalid dataset");
                }
                state.flush_events();
            }
            DriverCommand::Close(id) => {
                state.runtime.lock().close(id);
                state.flush_events();
            }
            DriverCommand::JobDone(success) => {
                info!(success, "driver reported the run function finished");
                break;
            }
        }
    }
}
