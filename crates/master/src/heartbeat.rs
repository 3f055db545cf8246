// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pings every known worker on a fixed interval and reaps any that have
//! missed too many in a row, re-queuing whatever task they were holding.

use mr_core::Clock;
use mr_wire::PingRequest;
use tracing::warn;

use crate::state::MasterState;

pub async fn run<C: Clock + 'static>(state: MasterState<C>) {
    let interval = state.config.ping_interval;
    let miss_limit = state.config.ping_miss_limit;
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        ping_all(&state).await;
        reap_lost(&state, miss_limit);
    }
}

async fn ping_all<C: Clock + 'static>(state: &MasterState<C>) {
    let live = state.workers.lock().live_workers();
    for (worker_id, addr, cookie) in live {
        let url = format!("http://{addr}/ping");
        let body = PingRequest { cookie: cookie.clone() };
        let result = state.http.post(&url).json(&body).timeout(state.config.rpc_timeout).send().await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                if let Err(err) = state.workers.lock().record_ping(&worker_id, cookie.as_str()) {
                    warn!(worker = %worker_id, %err, "ping accepted but registry rejected it");
                }
            }
            Ok(resp) => {
                warn!(worker = %worker_id, status = %resp.status(), "ping rejected");
            }
            Err(err) => {
                // Left un-refreshed; `reap_lost` below counts this as a miss.
                warn!(worker = %worker_id, %err, "ping request failed");
            }
        }
    }
}

fn reap_lost<C: Clock + 'static>(state: &MasterState<C>, miss_limit: u32) {
    let lost = state.workers.lock().sweep(miss_limit);
    if lost.is_empty() {
        return;
    }
    let mut runtime = state.runtime.lock();
    for (worker_id, outstanding) in lost {
        warn!(worker = %worker_id, "worker declared lost");
        if let Some((dataset_id, task_index)) = outstanding {
            let _ = runtime.task_lost(dataset_id, task_index);
        }
    }
    drop(runtime);
    state.flush_events();
}
