// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mr_core::DatasetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("dataset {0} not found")]
    UnknownDataset(DatasetId),

    #[error("dataset {0} already exists")]
    DuplicateDataset(DatasetId),

    #[error("dataset {0} has no input dataset to depend on")]
    MissingInput(DatasetId),

    #[error("task ({dataset}, {task_index}) exceeded {limit} retries, job failed")]
    TaskRetriesExhausted {
        dataset: DatasetId,
        task_index: u32,
        limit: u32,
    },

    #[error("user function failed on task ({dataset}, {task_index}): {reason}")]
    UserFunctionFailed {
        dataset: DatasetId,
        task_index: u32,
        reason: String,
    },
}
