// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by every crate in the workspace.

use thiserror::Error;

/// Errors that can arise from the shared data model itself (construction,
/// invariant checks) as opposed to scheduling or transport.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("dataset {0} not found in graph")]
    UnknownDataset(String),

    #[error("bucket ({source}, {split}) is empty and has no url")]
    EmptyBucket { source: u32, split: u32 },

    #[error("invalid split count: {0}")]
    InvalidSplitCount(u32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
