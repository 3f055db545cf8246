// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mr_core::{DatasetId, DatasetKind};

fn make_input(sources: u32, splits: u32, empty_columns: &[u32]) -> Dataset {
    let mut ds = Dataset::new(DatasetId::new(), sources, splits, DatasetKind::LocalData);
    for split in 0..splits {
        if empty_columns.contains(&split) {
            continue;
        }
        for source in 0..sources {
            ds.bucket_mut(source, split).mark_ready("http://x/b", "b");
        }
    }
    ds
}

#[test]
fn make_tasks_skips_empty_columns() {
    let input = make_input(2, 4, &[1, 3]);
    let mut tl = TaskList::make_tasks(&input, 4);
    assert_eq!(tl.remaining_count(), 2);
    assert_eq!(tl.pop_ready(), Some(0));
    assert_eq!(tl.pop_ready(), Some(2));
    assert_eq!(tl.pop_ready(), None);
}

#[test]
fn zero_tasks_is_immediately_complete() {
    let input = make_input(0, 0, &[]);
    let tl = TaskList::make_tasks(&input, 0);
    assert!(tl.is_complete());
    assert_eq!(tl.percent_complete(0), 1.0);
}

#[test]
fn mark_done_shrinks_remaining_and_completes() {
    let input = make_input(1, 2, &[]);
    let mut tl = TaskList::make_tasks(&input, 2);
    assert!(!tl.is_complete());
    assert!(tl.mark_done(0));
    assert!(!tl.is_complete());
    assert!(tl.mark_done(1));
    assert!(tl.is_complete());
    // Double completion is not itself an error, just a no-op signal.
    assert!(!tl.mark_done(1));
}

#[test]
fn requeue_front_puts_task_ahead_of_others() {
    let input = make_input(1, 3, &[]);
    let mut tl = TaskList::make_tasks(&input, 3);
    tl.pop_ready();
    tl.pop_ready();
    tl.requeue_front(0);
    assert_eq!(tl.pop_ready(), Some(0));
}

#[test]
fn requeue_front_is_noop_once_task_is_done() {
    let input = make_input(1, 1, &[]);
    let mut tl = TaskList::make_tasks(&input, 1);
    tl.pop_ready();
    tl.mark_done(0);
    tl.requeue_front(0);
    assert_eq!(tl.pop_ready(), None);
}

#[test]
fn percent_complete_tracks_fraction_done() {
    let input = make_input(1, 4, &[]);
    let mut tl = TaskList::make_tasks(&input, 4);
    assert_eq!(tl.percent_complete(4), 0.0);
    tl.mark_done(0);
    assert_eq!(tl.percent_complete(4), 0.25);
}
