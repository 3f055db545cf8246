// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mr_core::WorkerId;
use mr_wire::{SigninRequest, SigninResponse};
use tracing::info;

use crate::error::WorkerError;
use crate::state::WorkerState;

/// Contact the master, establish this worker's cookie and listening port,
/// and record the assigned id for later `task_done` reports.
pub async fn signin(state: &WorkerState) -> Result<WorkerId, WorkerError> {
    let req = SigninRequest { cookie: state.cookie.clone(), port: state.config.listen_addr.port() };
    let url = format!("{}/signin", state.config.master_url);
    let resp: SigninResponse = state
        .http
        .post(&url)
        .json(&req)
        .timeout(state.config.rpc_timeout)
        .send()
        .await?
        .error_for_status()
        .map_err(|err| WorkerError::SigninRejected(err.to_string()))?
        .json()
        .await?;
    let worker_id = resp.worker_id.ok_or_else(|| WorkerError::SigninRejected("master returned no worker id".into()))?;
    let worker_id = WorkerId::new(worker_id.as_str());
    *state.worker_id.lock() = Some(worker_id.clone());
    info!(worker = %worker_id, master = %state.config.master_url, "signed in");
    Ok(worker_id)
}
