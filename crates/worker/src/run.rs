// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mr_core::Registry;
use tracing::info;

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::http;
use crate::signin;
use crate::state::WorkerState;

/// Bind the worker's HTTP listener, sign in with the master, and serve
/// `assign`/`cancel`/`ping`/bucket requests until the listener is closed.
pub async fn run(config: WorkerConfig, registry: Registry) -> Result<(), WorkerError> {
    let listen_addr = config.listen_addr;
    let state = WorkerState::new(config, registry);

    let listener = tokio::net::TcpListener::bind(listen_addr).await.map_err(WorkerError::Bind)?;
    info!(%listen_addr, "worker listening");

    signin::signin(&state).await?;

    let app = http::router(state);
    axum::serve(listener, app).await.map_err(WorkerError::Bind)?;
    Ok(())
}
