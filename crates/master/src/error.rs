// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mr_core::WorkerId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MasterError {
    #[error("worker {0} signed in with a cookie already in use")]
    SigninRejected(WorkerId),

    #[error("unknown worker {0}")]
    UnknownWorker(WorkerId),

    #[error("ping cookie mismatch for worker {0}, treating as lost")]
    CookieMismatch(WorkerId),

    #[error("scheduler error: {0}")]
    Scheduler(#[from] mr_scheduler::SchedulerError),

    #[error("http bind failed: {0}")]
    Bind(#[from] std::io::Error),

    #[error("request to worker failed: {0}")]
    WorkerRequest(#[from] reqwest::Error),
}
