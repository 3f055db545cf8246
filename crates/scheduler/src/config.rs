// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mr_core::env;

/// Tunables for the task scheduler. Defaults come from [`mr_core::env`] so a
/// deployment can override them without a code change.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Same-task failures tolerated before its dataset (and the job) fails.
    pub max_task_retries: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_task_retries: env::max_task_retries(),
        }
    }
}

impl SchedulerConfig {
    mr_core::setters! {
        set { max_task_retries: u32 }
    }
}
