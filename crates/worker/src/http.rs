// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker's HTTP surface: `assign`, `cancel`, `ping`, called by the
//! master, plus `/buckets/*path` for downstream tasks fetching this
//! worker's output.

use std::path::{Path as FsPath, PathBuf};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mr_core::env;
use mr_wire::{AssignRequest, CancelRequest, PingRequest, TaskDoneRequest, TaskFailedRequest};
use tracing::{error, info, warn};

use crate::error::WorkerError;
use crate::execute;
use crate::state::WorkerState;

impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        warn!(error = %self, "worker handler returned an error");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub fn router(state: WorkerState) -> Router {
    Router::new()
        .route("/assign", post(assign))
        .route("/cancel", post(cancel))
        .route("/ping", post(ping))
        .route("/buckets/*path", get(serve_bucket))
        .with_state(state)
}

async fn assign(State(state): State<WorkerState>, Json(req): Json<AssignRequest>) -> StatusCode {
    let task = req.task;
    info!(dataset = %task.dataset_id, task_index = task.task_index, op = task.op.name(), "task assigned");
    tokio::spawn(async move {
        let dataset_id = task.dataset_id;
        let task_index = task.task_index;
        match execute::run_task(&state, &task).await {
            Ok(outputs) => {
                if state.is_cancelled(dataset_id, task_index) {
                    info!(%dataset_id, task_index, "task finished after being cancelled, dropping result");
                    return;
                }
                report_done(&state, dataset_id, task_index, outputs).await;
            }
            Err(err) => {
                error!(%dataset_id, task_index, %err, "task execution failed");
                if state.is_cancelled(dataset_id, task_index) {
                    return;
                }
                report_failed(&state, dataset_id, task_index, err.to_string()).await;
            }
        }
    });
    StatusCode::OK
}

async fn report_done(
    state: &WorkerState,
    dataset_id: mr_core::DatasetId,
    task_index: u32,
    outputs: Vec<mr_wire::TaskOutput>,
) {
    let Some(worker_id) = state.worker_id() else {
        error!("task completed before signin finished, cannot report");
        return;
    };
    let req = TaskDoneRequest { worker_id: worker_id.as_str().into(), dataset_id, task_index, outputs };
    let url = format!("{}/task_done", state.config.master_url);
    if let Err(err) = state.http.post(&url).json(&req).timeout(state.config.rpc_timeout).send().await {
        error!(%dataset_id, task_index, %err, "failed to report task completion to master");
    }
}

async fn report_failed(state: &WorkerState, dataset_id: mr_core::DatasetId, task_index: u32, reason: String) {
    let Some(worker_id) = state.worker_id() else {
        error!("task failed before signin finished, cannot report");
        return;
    };
    let req = TaskFailedRequest { worker_id: worker_id.as_str().into(), dataset_id, task_index, reason };
    let url = format!("{}/task_failed", state.config.master_url);
    if let Err(err) = state.http.post(&url).json(&req).timeout(state.config.rpc_timeout).send().await {
        error!(%dataset_id, task_index, %err, "failed to report task failure to master");
    }
}

async fn cancel(State(state): State<WorkerState>, Json(req): Json<CancelRequest>) -> StatusCode {
    state.cancelled.lock().insert((req.dataset_id, req.task_index));
    StatusCode::OK
}

async fn ping(State(state): State<WorkerState>, Json(req): Json<PingRequest>) -> StatusCode {
    if req.cookie == state.cookie {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    }
}

async fn serve_bucket(Path(path): Path<String>) -> Result<Vec<u8>, StatusCode> {
    let relative = FsPath::new(&path);
    if relative.components().any(|c| !matches!(c, std::path::Component::Normal(_))) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let full = PathBuf::from(env::state_dir()).join(relative);
    tokio::fs::read(&full).await.map_err(|_| StatusCode::NOT_FOUND)
}
