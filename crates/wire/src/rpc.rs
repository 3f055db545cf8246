// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RPC message bodies carried as JSON over HTTP between master and worker.

use mr_core::{BucketFormat, DatasetId, Operation};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// `signin`: worker -> master. Establishes identity and the port the worker
/// listens on for `assign`/`cancel` calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    /// Opaque value the worker chooses; echoed back on every `ping`.
    pub cookie: SmolStr,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninResponse {
    pub ok: bool,
    pub worker_id: Option<SmolStr>,
}

/// `ping`: either direction. A mismatched cookie is treated like a miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingRequest {
    pub cookie: SmolStr,
}

/// `assign`: master -> worker. Full task description; the worker needs
/// nothing else to execute it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub dataset_id: DatasetId,
    /// Index into the input dataset's columns, and the output dataset's rows.
    pub task_index: u32,
    pub op: Operation,
    /// URL of the input bucket at this task's column, per source. `None` for
    /// sources whose bucket at this column is empty.
    pub input_urls: Vec<Option<SmolStr>>,
    /// Format the input dataset's buckets were written in. Decodes
    /// `input_urls`; unrelated to `output_format`, which governs the format
    /// this task writes its own output in.
    pub input_format: BucketFormat,
    /// Number of output splits to partition into.
    pub output_splits: u32,
    pub output_format: BucketFormat,
    /// Directory (on the worker) the output buckets should be written under.
    pub output_dir: SmolStr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub task: TaskDescriptor,
}

/// `task_done`: worker -> master.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDoneRequest {
    pub worker_id: SmolStr,
    pub dataset_id: DatasetId,
    pub task_index: u32,
    pub outputs: Vec<TaskOutput>,
}

/// Reported by a worker when `run_task` fails after exhausting its own
/// in-task retries (see [`TaskDescriptor`]'s `input_format`/fetch retry
/// handling on the worker side); drives the same `task_lost` path as an
/// assign failure observed by the master directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFailedRequest {
    pub worker_id: SmolStr,
    pub dataset_id: DatasetId,
    pub task_index: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    pub split: u32,
    pub url: SmolStr,
}

/// `cancel`: master -> worker. Withdraws an in-flight or queued task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub dataset_id: DatasetId,
    pub task_index: u32,
}
