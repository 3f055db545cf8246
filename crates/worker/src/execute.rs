// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task execution: fetch input buckets, run the task's operation through the
//! registry, spill output buckets to disk, and build their URLs.

use std::path::PathBuf;

use mr_core::{BucketFormat, Operation, Registry};
use mr_wire::{decode_pairs, encode_pairs, TaskDescriptor, TaskOutput};
use tracing::{debug, warn};

use crate::error::WorkerError;
use crate::state::WorkerState;

type Pair = (Vec<u8>, Vec<u8>);

pub async fn run_task(state: &WorkerState, task: &TaskDescriptor) -> Result<Vec<TaskOutput>, WorkerError> {
    let inputs = fetch_inputs(state, task).await?;
    let output_splits = task.output_splits.max(1);
    let outputs = execute_op(&task.op, &state.registry, inputs, output_splits)?;
    spill(state, task, outputs).await
}

async fn fetch_inputs(state: &WorkerState, task: &TaskDescriptor) -> Result<Vec<Pair>, WorkerError> {
    let mut pairs = Vec::new();
    for url in task.input_urls.iter().flatten() {
        let bytes = fetch_bucket(state, url).await?;
        pairs.extend(decode_pairs(task.input_format, &bytes)?);
    }
    Ok(pairs)
}

/// Fetches one bucket's bytes, retrying transient HTTP failures with
/// doubling backoff up to `fetch_max_attempts` before giving up.
async fn fetch_bucket(state: &WorkerState, url: &str) -> Result<bytes::Bytes, WorkerError> {
    let attempts = state.config.fetch_max_attempts.max(1);
    let mut backoff = state.config.fetch_retry_backoff;
    let mut attempt = 0;
    loop {
        attempt += 1;
        debug!(%url, attempt, "fetching input bucket");
        let result = async {
            state
                .http
                .get(url)
                .timeout(state.config.rpc_timeout)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await
        }
        .await;
        match result {
            Ok(bytes) => return Ok(bytes),
            Err(err) if attempt < attempts => {
                warn!(%url, attempt, %err, "fetching input bucket failed, retrying");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn execute_op(
    op: &Operation,
    registry: &Registry,
    inputs: Vec<Pair>,
    output_splits: u32,
) -> Result<Vec<Vec<Pair>>, WorkerError> {
    let mut outputs: Vec<Vec<Pair>> = (0..output_splits).map(|_| Vec::new()).collect();
    match op {
        Operation::Map { mapper, partitioner } => {
            let map_fn = registry.mapper(mapper).ok_or_else(|| WorkerError::UnknownMapper(mapper.clone()))?;
            let part_fn = registry
                .partitioner(partitioner)
                .ok_or_else(|| WorkerError::UnknownPartitioner(partitioner.clone()))?;
            for (key, value) in inputs {
                for (k2, v2) in map_fn(&key, &value) {
                    let split = part_fn(&k2, output_splits) as usize % outputs.len();
                    outputs[split].push((k2, v2));
                }
            }
        }
        Operation::Reduce { reducer } => {
            let reduce_fn = registry.reducer(reducer).ok_or_else(|| WorkerError::UnknownReducer(reducer.clone()))?;
            // A plain reduce carries no partitioner (it's meant to collapse,
            // not fan back out); every pair lands in split 0.
            for (key, values) in group_by_key(inputs) {
                let mut values = values.into_iter();
                for v in reduce_fn(&key, &mut values) {
                    outputs[0].push((key.clone(), v));
                }
            }
        }
        Operation::ReduceMap { reducer, mapper, partitioner } => {
            let reduce_fn = registry.reducer(reducer).ok_or_else(|| WorkerError::UnknownReducer(reducer.clone()))?;
            let map_fn = registry.mapper(mapper).ok_or_else(|| WorkerError::UnknownMapper(mapper.clone()))?;
            let part_fn = registry
                .partitioner(partitioner)
                .ok_or_else(|| WorkerError::UnknownPartitioner(partitioner.clone()))?;
            for (key, values) in group_by_key(inputs) {
                let mut values = values.into_iter();
                for v in reduce_fn(&key, &mut values) {
                    for (k2, v2) in map_fn(&key, &v) {
                        let split = part_fn(&k2, output_splits) as usize % outputs.len();
                        outputs[split].push((k2, v2));
                    }
                }
            }
        }
    }
    Ok(outputs)
}

/// Groups pairs by key via a stable sort, so values within a group keep the
/// relative order they were fetched in even though key order is not.
fn group_by_key(mut pairs: Vec<Pair>) -> Vec<(Vec<u8>, Vec<Vec<u8>>)> {
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let mut groups: Vec<(Vec<u8>, Vec<Vec<u8>>)> = Vec::new();
    for (key, value) in pairs {
        match groups.last_mut() {
            Some((last_key, values)) if *last_key == key => values.push(value),
            _ => groups.push((key, vec![value])),
        }
    }
    groups
}

async fn spill(
    state: &WorkerState,
    task: &TaskDescriptor,
    outputs: Vec<Vec<Pair>>,
) -> Result<Vec<TaskOutput>, WorkerError> {
    let dir = PathBuf::from(task.output_dir.as_str());
    tokio::fs::create_dir_all(&dir).await?;

    let mut reported = Vec::new();
    for (split, pairs) in outputs.into_iter().enumerate() {
        if pairs.is_empty() {
            continue;
        }
        let filename = format!("source_{}_split_{split}.{}", task.task_index, ext(task.output_format));
        let bytes = encode_pairs(task.output_format, &pairs);
        tokio::fs::write(dir.join(&filename), &bytes).await?;
        let url = format!("http://{}/buckets/{}/{filename}", state.config.listen_addr, task.dataset_id);
        reported.push(TaskOutput { split: split as u32, url: url.into() });
    }
    Ok(reported)
}

fn ext(format: BucketFormat) -> &'static str {
    format.extension()
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;
