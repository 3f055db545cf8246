// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The master's HTTP surface: `signin` and `task_done`, called by workers.
//!
//! Handlers are thin; all the real logic lives in [`WorkerRegistry`] and
//! [`mr_scheduler::Runtime`]. This mirrors the daemon's listener handlers,
//! which stay a few lines and delegate into state.

use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};

use axum::extract::{ConnectInfo, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mr_core::{env, Clock, WorkerId};
use mr_wire::{PingRequest, SigninRequest, SigninResponse, TaskDoneRequest, TaskFailedRequest};
use tracing::{info, warn};

use crate::error::MasterError;
use crate::state::MasterState;

impl IntoResponse for MasterError {
    fn into_response(self) -> Response {
        let status = match &self {
            MasterError::SigninRejected(_) | MasterError::CookieMismatch(_) => StatusCode::FORBIDDEN,
            MasterError::UnknownWorker(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(error = %self, "rpc handler returned an error");
        (status, self.to_string()).into_response()
    }
}

pub fn router<C: Clock + 'static>(state: MasterState<C>) -> Router {
    Router::new()
        .route("/signin", post(signin::<C>))
        .route("/ping", post(ping::<C>))
        .route("/task_done", post(task_done::<C>))
        .route("/task_failed", post(task_failed::<C>))
        .route("/buckets/*path", get(serve_bucket::<C>))
        .with_state(state)
}

/// Serves `local_data` bucket files written directly by the driver (which
/// shares this process), under the job's state directory. Workers serve
/// their own task output the same way (see `mr_worker::http`).
async fn serve_bucket<C: Clock + 'static>(
    State(_state): State<MasterState<C>>,
    Path(path): Path<String>,
) -> Result<Vec<u8>, StatusCode> {
    let relative = FsPath::new(&path);
    if relative.components().any(|c| !matches!(c, std::path::Component::Normal(_))) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let full = PathBuf::from(env::state_dir()).join(relative);
    tokio::fs::read(&full).await.map_err(|_| StatusCode::NOT_FOUND)
}

async fn signin<C: Clock + 'static>(
    State(state): State<MasterState<C>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, MasterError> {
    let addr = SocketAddr::new(peer.ip(), req.port);
    let worker_id = state.workers.lock().signin(req.cookie, addr)?;
    info!(worker = %worker_id, %addr, "worker signed in");
    Ok(Json(SigninResponse { ok: true, worker_id: Some(worker_id.as_str().into()) }))
}

async fn ping<C: Clock + 'static>(
    State(_state): State<MasterState<C>>,
    Json(_req): Json<PingRequest>,
) -> StatusCode {
    // Workers are not required to ping the master in this design (the
    // master pings workers, see `crate::heartbeat`); accept and ignore so a
    // worker implementation that does ping both ways doesn't break.
    StatusCode::OK
}

async fn task_done<C: Clock + 'static>(
    State(state): State<MasterState<C>>,
    Json(req): Json<TaskDoneRequest>,
) -> StatusCode {
    let outputs = req.outputs.into_iter().map(|o| (o.split, o.url.to_string())).collect();
    {
        let mut runtime = state.runtime.lock();
        runtime.task_done(req.dataset_id, req.task_index, outputs);
    }
    state.workers.lock().mark_idle(&WorkerId::new(req.worker_id.as_str()));
    state.flush_events();
    info!(dataset = %req.dataset_id, task_index = req.task_index, "task completed");
    StatusCode::OK
}

/// A worker reports that `run_task` itself failed (fetch retries exhausted,
/// or the user's mapper/reducer returned an error). Releases the worker back
/// to idle and routes the task through the same `task_lost`/retry path as an
/// assign failure observed directly by `mr_master::dispatch`.
async fn task_failed<C: Clock + 'static>(
    State(state): State<MasterState<C>>,
    Json(req): Json<TaskFailedRequest>,
) -> StatusCode {
    warn!(
        worker = %req.worker_id,
        dataset = %req.dataset_id,
        task_index = req.task_index,
        reason = %req.reason,
        "worker reported task failure"
    );
    state.workers.lock().mark_idle(&WorkerId::new(req.worker_id.as_str()));
    let _ = state.runtime.lock().task_lost(req.dataset_id, req.task_index);
    state.flush_events();
    StatusCode::OK
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
