// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mr_core::{ComputedData, Operation};
use smol_str::SmolStr;

fn local(sources: u32, splits: u32) -> Dataset {
    Dataset::new(DatasetId::new(), sources, splits, DatasetKind::LocalData)
}

fn computed(input_id: DatasetId, ntasks: u32) -> Dataset {
    Dataset::new(
        DatasetId::new(),
        ntasks,
        1,
        DatasetKind::Computed(ComputedData {
            input_id,
            ntasks,
            op: Operation::Map {
                mapper: SmolStr::new("identity"),
                partitioner: SmolStr::new("hash"),
            },
            computing: true,
            fetched: false,
        }),
    )
}

#[test]
fn submit_rejects_duplicate_id() {
    let mut g = DatasetGraph::new();
    let a = local(1, 1);
    let id = a.id;
    g.submit(a).unwrap();
    let dup = Dataset::new(id, 1, 1, DatasetKind::LocalData);
    assert!(matches!(g.submit(dup), Err(SchedulerError::DuplicateDataset(_))));
}

#[test]
fn submit_computed_without_input_is_rejected() {
    let mut g = DatasetGraph::new();
    let orphan = computed(DatasetId::new(), 1);
    assert!(matches!(g.submit(orphan), Err(SchedulerError::MissingInput(_))));
}

#[test]
fn close_is_deferred_while_computing() {
    let mut g = DatasetGraph::new();
    let a = local(1, 2);
    let a_id = a.id;
    g.submit(a).unwrap();
    let b = computed(a_id, 2);
    let b_id = b.id;
    g.submit(b).unwrap();

    g.close(b_id);
    assert!(!g.is_closed(b_id), "b is still computing, close must be deferred");
    assert!(g.has_close_request(b_id), "the close request itself is recorded immediately");

    g.on_dataset_done(b_id);
    assert!(g.is_closed(b_id));
}

#[test]
fn remove_only_happens_after_dependents_are_gone() {
    let mut g = DatasetGraph::new();
    let a = local(1, 2);
    let a_id = a.id;
    g.submit(a).unwrap();
    let b = computed(a_id, 2);
    let b_id = b.id;
    g.submit(b).unwrap();

    g.close(a_id);
    assert!(!g.is_closed(a_id), "a has a computing dependent, close deferred");

    g.on_dataset_done(b_id);
    g.close(b_id);
    assert!(!g.contains(b_id), "b had no dependents, should be fully removed");
    assert!(!g.contains(a_id), "removing b should have unblocked a's close and removal");
}

#[test]
fn early_close_of_a_parent_still_lets_dependents_finish() {
    let mut g = DatasetGraph::new();
    let a = local(1, 1);
    let a_id = a.id;
    g.submit(a).unwrap();
    let b = computed(a_id, 1);
    let b_id = b.id;
    g.submit(b).unwrap();

    g.close(a_id);
    assert!(g.contains(a_id), "a must survive until b is done");

    g.on_dataset_done(b_id);
    g.close(b_id);
    assert!(!g.contains(b_id));
    assert!(!g.contains(a_id));
}
