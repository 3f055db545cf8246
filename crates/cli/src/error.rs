// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("master exited with an error: {0}")]
    Master(#[from] mr_master::MasterError),
    #[error("worker exited with an error: {0}")]
    Worker(#[from] mr_worker::WorkerError),
    #[error("driver run failed: {0}")]
    Driver(#[from] mr_driver::DriverError),
    #[error("could not clean up the shared directory {0}: {1}")]
    Cleanup(std::path::PathBuf, std::io::Error),
}

impl CliError {
    /// Exit code convention: bootstrap/bind failures (surfaced through
    /// `Master`/`Worker`) are distinct from a failed run function, so
    /// scripts can tell "never started" from "ran and failed".
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Master(_) | CliError::Worker(_) => 3,
            CliError::Driver(_) => 4,
            CliError::Cleanup(..) => 5,
        }
    }
}
