// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment-variable configuration accessors.
//!
//! Every knob a deployment might want to override without a flag lives here,
//! each with a sane default so unit tests never need to set the environment.

use std::time::Duration;

fn var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Directory the master and workers use for job scratch space, unless overridden
/// by the `--shared-dir` CLI flag.
pub fn state_dir() -> String {
    std::env::var("MR_STATE_DIR").unwrap_or_else(|_| "/tmp/mr-jobs".to_string())
}

/// Per-RPC-call timeout; bounds how long a dead peer can block progress.
pub fn rpc_timeout() -> Duration {
    Duration::from_millis(var_or("MR_RPC_TIMEOUT_MS", 1_000))
}

/// Interval between heartbeat pings sent to each registered worker.
pub fn ping_interval() -> Duration {
    Duration::from_millis(var_or("MR_PING_INTERVAL_MS", 5_000))
}

/// Consecutive missed pings before a worker is declared lost.
pub fn ping_miss_limit() -> u32 {
    var_or("MR_PING_MISS_LIMIT", 3)
}

/// Default number of times a single task may fail before its dataset fails the job.
pub fn max_task_retries() -> u32 {
    var_or("MR_MAX_TASK_RETRIES", 3)
}

/// Number of attempts a worker makes to fetch one input bucket before giving
/// up on the task (1 means no retry, just the initial attempt).
pub fn fetch_max_attempts() -> u32 {
    var_or("MR_FETCH_MAX_ATTEMPTS", 4)
}

/// Base delay for the fetch retry backoff; doubles after each failed attempt.
pub fn fetch_retry_backoff() -> Duration {
    Duration::from_millis(var_or("MR_FETCH_RETRY_BACKOFF_MS", 100))
}

/// Default reduce-task count used by drivers that don't specify `splits` explicitly.
pub fn default_reduce_tasks() -> u32 {
    var_or("MR_DEFAULT_REDUCE_TASKS", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable_without_env_vars() {
        assert_eq!(max_task_retries(), 3);
        assert_eq!(ping_miss_limit(), 3);
        assert_eq!(default_reduce_tasks(), 1);
        assert_eq!(fetch_max_attempts(), 4);
        assert_eq!(fetch_retry_backoff(), Duration::from_millis(100));
    }

    #[test]
    fn rpc_timeout_has_a_sane_default() {
        assert_eq!(rpc_timeout(), Duration::from_secs(1));
    }
}
