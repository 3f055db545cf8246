// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mr_core::{Clock, SystemClock};
use mr_scheduler::{DriverCommand, DriverEvent};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::MasterConfig;
use crate::error::MasterError;
use crate::state::MasterState;
use crate::{dispatch, driver_bridge, heartbeat, http};

/// Start the master: bind the HTTP listener, spawn the dispatch, heartbeat,
/// and driver-bridge loops, and serve worker RPCs until the HTTP server
/// exits.
///
/// `driver_tx` carries scheduler events out to the driver; `driver_rx`
/// carries dataset submit/close/job-done commands in from it. Both are
/// `None` for a standalone master with no embedded driver (a worker has
/// nothing to report progress to but its own logs).
pub async fn run(
    config: MasterConfig,
    driver_tx: mpsc::UnboundedSender<DriverEvent>,
    driver_rx: mpsc::UnboundedReceiver<DriverCommand>,
) -> Result<(), MasterError> {
    run_with_clock(config, SystemClock, driver_tx, driver_rx).await
}

pub async fn run_with_clock<C: Clock + 'static>(
    config: MasterConfig,
    clock: C,
    driver_tx: mpsc::UnboundedSender<DriverEvent>,
    driver_rx: mpsc::UnboundedReceiver<DriverCommand>,
) -> Result<(), MasterError> {
    let listen_addr = config.listen_addr;
    let state = MasterState::new(config, clock, driver_tx);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(%listen_addr, "master listening");

    tokio::spawn(dispatch::run(state.clone()));
    tokio::spawn(heartbeat::run(state.clone()));
    tokio::spawn(driver_bridge::run(state.clone(), driver_rx));

    let app = http::router(state).into_make_service_with_connect_info::<std::net::SocketAddr>();
    axum::serve(listener, app).await?;
    Ok(())
}
