// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mr-driver: the user-facing programmatic surface of a job.
//!
//! A driver program builds a [`mr_core::Registry`] of its mappers, reducers,
//! and partitioners, then calls [`run`] with a `run` function that receives
//! a [`Job`] and composes datasets with `file_data`/`local_data`/`map_data`/
//! `reduce_data`/`reducemap_data`, blocking on `wait` as needed. The master
//! this job talks to is embedded in the same process (see [`mod@run`]);
//! only workers are separate processes, reached over HTTP.

mod error;
mod job;
mod manager;
mod run;

pub use error::DriverError;
pub use job::Job;
pub use run::run;
