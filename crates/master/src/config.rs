// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use mr_core::env;
use mr_scheduler::SchedulerConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Everything the master binary needs to bind and run.
#[derive(Debug, Clone)]
pub struct MasterConfig {
    pub listen_addr: SocketAddr,
    pub ping_interval: Duration,
    pub ping_miss_limit: u32,
    pub rpc_timeout: Duration,
    pub scheduler: SchedulerConfigArgs,
}

/// Scheduler knobs surfaced on the master's CLI.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfigArgs {
    pub max_task_retries: u32,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:7070".parse().unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 7070))),
            ping_interval: env::ping_interval(),
            ping_miss_limit: env::ping_miss_limit(),
            rpc_timeout: env::rpc_timeout(),
            scheduler: SchedulerConfigArgs { max_task_retries: env::max_task_retries() },
        }
    }
}

impl MasterConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::default().max_task_retries(self.scheduler.max_task_retries)
    }

    mr_core::setters! {
        set { listen_addr: SocketAddr }
        set { ping_interval: Duration }
        set { ping_miss_limit: u32 }
        set { rpc_timeout: Duration }
    }
}
