// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("no mapper registered under the name {0:?}")]
    UnknownMapper(SmolStr),

    #[error("no reducer registered under the name {0:?}")]
    UnknownReducer(SmolStr),

    #[error("no partitioner registered under the name {0:?}")]
    UnknownPartitioner(SmolStr),

    #[error("master rejected signin: {0}")]
    SigninRejected(String),

    #[error("fetching an input bucket failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("decoding a bucket failed: {0}")]
    Protocol(#[from] mr_wire::ProtocolError),

    #[error("writing an output bucket failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("http bind failed: {0}")]
    Bind(std::io::Error),
}
