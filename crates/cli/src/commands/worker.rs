// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mr worker` - sign in with a master and execute assigned tasks.

use mr_core::Registry;
use mr_worker::WorkerConfig;

use crate::args::SharedArgs;
use crate::error::CliError;

pub async fn run(shared: SharedArgs, registry: Registry) -> Result<(), CliError> {
    let master_url = normalize_master_url(&shared.master_url);
    let worker_config = WorkerConfig::new(master_url, shared.listen_addr(7071)).rpc_timeout(shared.rpc_timeout());

    mr_worker::run(worker_config, registry).await.map_err(CliError::Worker)
}

fn normalize_master_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}
