// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mr-core: shared data model, ids, clock, and errors for the MapReduce runtime.

pub mod macros;

pub mod clock;
pub mod dataset;
pub mod env;
pub mod error;
pub mod id;
pub mod ids;
pub mod registry;
pub mod worker;

pub use clock::{Clock, FakeClock, SystemClock};
pub use dataset::{Bucket, BucketFormat, ComputedData, Dataset, DatasetKind, Operation};
pub use error::CoreError;
pub use id::{short, IdBuf};
pub use ids::{DatasetId, JobRunId};
pub use registry::{MapFn, PartitionFn, ReduceFn, Registry};
pub use worker::WorkerId;
