// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mr_core::{ComputedData, DatasetKind, Operation};
use smol_str::SmolStr;

fn local_with_data(sources: u32, splits: u32) -> Dataset {
    let mut ds = Dataset::new(DatasetId::new(), sources, splits, DatasetKind::LocalData);
    for source in 0..sources {
        for split in 0..splits {
            ds.bucket_mut(source, split).mark_ready("http://x/b", "b");
        }
    }
    ds
}

fn map_stage(input_id: DatasetId, ntasks: u32, output_splits: u32) -> Dataset {
    Dataset::new(
        DatasetId::new(),
        ntasks,
        output_splits,
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
fn simple_map_dataset_dispatches_one_task_per_input_split() {
    let mut rt = Runtime::new(SchedulerConfig::default());
    let input = local_with_data(1, 3);
    let input_id = input.id;
    rt.submit(input).unwrap();

    let map = map_stage(input_id, 3, 2);
    let map_id = map.id;
    rt.submit(map).unwrap();

    let mut seen = Vec::new();
    while let Some((id, idx)) = rt.next_task() {
        assert_eq!(id, map_id);
        seen.push(idx);
        if seen.len() == 3 {
            break;
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn zero_split_input_completes_with_no_tasks() {
    let mut rt = Runtime::new(SchedulerConfig::default());
    let input = Dataset::new(DatasetId::new(), 0, 0, DatasetKind::LocalData);
    let input_id = input.id;
    rt.submit(input).unwrap();

    let map = map_stage(input_id, 0, 1);
    let map_id = map.id;
    rt.submit(map).unwrap();

    assert_eq!(rt.next_task(), None);
    let events = rt.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, DriverEvent::DatasetComputed { dataset_id, .. } if *dataset_id == map_id)));
}

#[test]
fn task_done_emits_bucket_ready_and_eventually_dataset_computed() {
    let mut rt = Runtime::new(SchedulerConfig::default());
    let input = local_with_data(1, 1);
    let input_id = input.id;
    rt.submit(input).unwrap();
    let map = map_stage(input_id, 1, 1);
    let map_id = map.id;
    rt.submit(map).unwrap();

    let (id, idx) = rt.next_task().unwrap();
    assert_eq!(id, map_id);
    rt.task_done(id, idx, vec![(0, "http://worker/bucket".to_string())]);

    let events = rt.drain_events();
    assert!(events.iter().any(|e| matches!(e, DriverEvent::BucketReady { .. })));
    assert!(events.iter().any(|e| matches!(e, DriverEvent::DatasetComputed { .. })));
}

#[test]
fn close_during_computation_suppresses_bucket_ready_even_though_not_yet_closed() {
    let mut rt = Runtime::new(SchedulerConfig::default());
    let input = local_with_data(1, 2);
    let input_id = input.id;
    rt.submit(input).unwrap();
    let map = map_stage(input_id, 2, 1);
    let map_id = map.id;
    rt.submit(map).unwrap();

    rt.close(map_id);
    assert!(!rt.graph().is_closed(map_id), "one task is still outstanding, can't be closed yet");

    let (id, idx) = rt.next_task().unwrap();
    rt.task_done(id, idx, vec![(0, "http://worker/bucket".to_string())]);

    let events = rt.drain_events();
    assert!(
        !events.iter().any(|e| matches!(e, DriverEvent::BucketReady { .. })),
        "a pending close request suppresses BucketReady even while the dataset is still computing"
    );
}

#[test]
fn task_lost_requeues_for_redispatch() {
    let mut rt = Runtime::new(SchedulerConfig::default());
    let input = local_with_data(1, 1);
    let input_id = input.id;
    rt.submit(input).unwrap();
    let map = map_stage(input_id, 1, 1);
    let map_id = map.id;
    rt.submit(map).unwrap();

    let (id, idx) = rt.next_task().unwrap();
    assert_eq!(rt.next_task(), None, "only one task exists and it's in flight");

    rt.task_lost(id, idx).unwrap();
    let (id2, idx2) = rt.next_task().unwrap();
    assert_eq!((id2, idx2), (map_id, idx));
}

#[test]
fn task_lost_beyond_retry_limit_fails_the_job() {
    let mut rt = Runtime::new(SchedulerConfig::default().max_task_retries(1));
    let input = local_with_data(1, 1);
    let input_id = input.id;
    rt.submit(input).unwrap();
    let map = map_stage(input_id, 1, 1);
    let map_id = map.id;
    rt.submit(map).unwrap();

    let (id, idx) = rt.next_task().unwrap();
    rt.task_lost(id, idx).unwrap(); // 1st loss: within limit
    let _ = rt.next_task().unwrap();
    let err = rt.task_lost(id, idx).unwrap_err(); // 2nd loss: exceeds limit of 1
    assert!(matches!(err, SchedulerError::TaskRetriesExhausted { .. }));

    let events = rt.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, DriverEvent::JobFailed { dataset_id, .. } if *dataset_id == map_id)));
}

#[test]
fn dependent_becomes_runnable_only_after_input_is_fully_done() {
    let mut rt = Runtime::new(SchedulerConfig::default());
    let input = local_with_data(1, 1);
    let input_id = input.id;
    rt.submit(input).unwrap();

    let stage_a = map_stage(input_id, 1, 1);
    let stage_a_id = stage_a.id;
    rt.submit(stage_a).unwrap();

    let stage_b = map_stage(stage_a_id, 1, 1);
    let stage_b_id = stage_b.id;
    rt.submit(stage_b).unwrap();

    // stage_b must not be dispatchable until stage_a finishes.
    let (id, idx) = rt.next_task().unwrap();
    assert_eq!(id, stage_a_id);
    assert_eq!(rt.next_task(), None);

    rt.task_done(id, idx, vec![(0, "http://worker/a-out".to_string())]);

    let (id2, _) = rt.next_task().unwrap();
    assert_eq!(id2, stage_b_id);
}

#[test]
fn percent_complete_reflects_remaining_tasks() {
    let mut rt = Runtime::new(SchedulerConfig::default());
    let input = local_with_data(1, 2);
    let input_id = input.id;
    rt.submit(input).unwrap();
    let map = map_stage(input_id, 2, 1);
    let map_id = map.id;
    rt.submit(map).unwrap();

    assert_eq!(rt.percent_complete(map_id), Some(0.0));
    let (_, idx) = rt.next_task().unwrap();
    rt.task_done(map_id, idx, vec![(0, "http://worker/out".to_string())]);
    assert_eq!(rt.percent_complete(map_id), Some(0.5));
}
