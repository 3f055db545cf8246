// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface of a runtime binary: `mr master`, `mr worker`,
//! `mr run serial`, `mr run mockparallel`. A user's driver program embeds
//! [`crate::main`] as its own `fn main`, so these flags are shared across
//! whatever job that program defines.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use mr_core::env;

#[derive(Parser)]
#[command(name = "mr", version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the master, the coordinating process of a job.
    Master(SharedArgs),
    /// Start a worker that signs in with a master and executes tasks.
    Worker(SharedArgs),
    /// Run the driver's `run` function, bootstrapping the worker pool too.
    Run {
        #[command(subcommand)]
        mode: RunMode,
    },
}

#[derive(Subcommand)]
pub enum RunMode {
    /// Run with exactly one in-process worker; easiest to debug.
    Serial(SharedArgs),
    /// Run with several in-process workers, simulating real parallelism
    /// without spawning separate worker processes.
    Mockparallel {
        #[command(flatten)]
        shared: SharedArgs,
        /// Number of in-process workers to run.
        #[arg(long, default_value = "2")]
        workers: u32,
    },
}

#[derive(Args, Clone)]
pub struct SharedArgs {
    /// Address the master listens on, or the worker/driver connects to.
    #[arg(long, default_value = "127.0.0.1:7070")]
    pub master_url: String,
    /// Address this process's own HTTP listener binds to (master or worker).
    #[arg(long)]
    pub listen: Option<SocketAddr>,
    /// Directory datasets and buckets are written under.
    #[arg(long)]
    pub shared_dir: Option<PathBuf>,
    /// Default number of reduce tasks for map/reducemap outputs that don't
    /// specify `splits` explicitly.
    #[arg(long)]
    pub reduce_tasks: Option<u32>,
    /// Maximum number of times a task is retried on a different worker
    /// before its dataset fails the job.
    #[arg(long)]
    pub max_task_retries: Option<u32>,
    /// Don't remove the shared directory once the job finishes.
    #[arg(long)]
    pub keep_jobdir: bool,
    /// Log per-task timing at info level instead of only on failure.
    #[arg(long)]
    pub profile: bool,
}

impl SharedArgs {
    pub fn listen_addr(&self, default_port: u16) -> SocketAddr {
        self.listen.unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], default_port)))
    }

    pub fn shared_dir(&self) -> PathBuf {
        self.shared_dir.clone().unwrap_or_else(|| PathBuf::from(env::state_dir()))
    }

    pub fn reduce_tasks(&self) -> u32 {
        self.reduce_tasks.unwrap_or_else(env::default_reduce_tasks)
    }

    pub fn max_task_retries(&self) -> u32 {
        self.max_task_retries.unwrap_or_else(env::max_task_retries)
    }

    pub fn rpc_timeout(&self) -> Duration {
        env::rpc_timeout()
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
