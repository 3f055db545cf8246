// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no mapper registered under the name {0:?}")]
    UnknownMapper(SmolStr),

    #[error("no reducer registered under the name {0:?}")]
    UnknownReducer(SmolStr),

    #[error("no partitioner registered under the name {0:?}")]
    UnknownPartitioner(SmolStr),

    #[error("the scheduler is no longer listening, the master may have exited")]
    Closed,

    #[error("writing a local_data bucket failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("the run function failed or panicked")]
    RunFailed,
}
