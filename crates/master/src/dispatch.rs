// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pulls ready tasks off the scheduler and pushes `assign` calls to idle
//! workers. Runs as its own background task so HTTP handlers stay thin.

use std::time::Duration;

use mr_core::{env, BucketFormat, Clock};
use mr_wire::{AssignRequest, TaskDescriptor};
use tracing::{info, warn};

use crate::state::MasterState;

/// Poll interval when there is nothing to dispatch; real progress is driven
/// by the http handlers waking idle workers, this is just the backstop.
const IDLE_POLL: Duration = Duration::from_millis(50);

pub async fn run<C: Clock + 'static>(state: MasterState<C>) {
    loop {
        let dispatched = try_dispatch_one(&state).await;
        if !dispatched {
            tokio::time::sleep(IDLE_POLL).await;
        }
    }
}

async fn try_dispatch_one<C: Clock + 'static>(state: &MasterState<C>) -> bool {
    let Some(worker_id) = state.workers.lock().idle_worker() else {
        return false;
    };
    let Some((dataset_id, task_index)) = state.runtime.lock().next_task() else {
        return false;
    };

    let task = {
        let runtime = state.runtime.lock();
        let Some(dataset) = runtime.graph().get(dataset_id) else {
            return false;
        };
        let Some(computed) = dataset.as_computed() else {
            return false;
        };
        let Some(input_urls) = runtime.task_descriptor_inputs(dataset_id, task_index) else {
            return false;
        };
        let input_format =
            runtime.graph().get(computed.input_id).map(|input| input.format()).unwrap_or_default();
        TaskDescriptor {
            dataset_id,
            task_index,
            op: computed.op.clone(),
            input_urls: input_urls.into_iter().map(|u| u.map(Into::into)).collect(),
            input_format,
            output_splits: dataset.splits,
            output_format: BucketFormat::default(),
            output_dir: format!("{}/{dataset_id}", env::state_dir()).into(),
        }
    };

    let Some(addr) = state.workers.lock().addr(&worker_id) else {
        // Worker vanished between idle_worker() and now; let the task
        // go back through task_lost on the next heartbeat sweep.
        return false;
    };
    state.workers.lock().assign(&worker_id, dataset_id, task_index);

    let url = format!("http://{addr}/assign");
    let body = AssignRequest { task };
    match state.http.post(&url).json(&body).timeout(state.config.rpc_timeout).send().await {
        Ok(resp) if resp.status().is_success() => {
            info!(worker = %worker_id, dataset = %dataset_id, task_index, "task assigned");
        }
        Ok(resp) => {
            warn!(worker = %worker_id, status = %resp.status(), "assign rejected by worker");
            let _ = state.runtime.lock().task_lost(dataset_id, task_index);
            state.flush_events();
        }
        Err(err) => {
            warn!(worker = %worker_id, %err, "assign request failed, treating worker as lost");
            let _ = state.runtime.lock().task_lost(dataset_id, task_index);
            state.flush_events();
        }
    }
    true
}
