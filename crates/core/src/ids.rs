// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed ids for datasets and job runs.

crate::define_id! {
    /// Identifies a dataset within the graph owned by the scheduler.
    pub struct DatasetId("ds-");
}

crate::define_id! {
    /// Identifies one execution of a user driver program.
    pub struct JobRunId("run-");
}
