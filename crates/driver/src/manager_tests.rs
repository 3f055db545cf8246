use super::*;
use mr_core::{Bucket, BucketFormat, DatasetId};

fn bucket_ready(dataset_id: DatasetId, source: u32) -> DriverEvent {
    DriverEvent::BucketReady { dataset_id, bucket: Bucket::new(source, 0, BucketFormat::default()) }
}

#[test]
fn progress_is_zero_before_any_bucket_and_one_when_untracked() {
    let state = ManagerState::new();
    let id = DatasetId::new();
    assert_eq!(state.progress(id), 1.0, "untracked datasets report done");
    state.track_computing(id, 4);
    assert_eq!(state.progress(id), 0.0);
}

#[test]
fn track_computing_marks_the_dataset_as_computing() {
    let state = ManagerState::new();
    let id = DatasetId::new();
    assert!(!state.is_computing(id));
    state.track_computing(id, 1);
    assert!(state.is_computing(id));
}

#[tokio::test]
async fn bucket_ready_events_advance_progress_by_highest_source_seen() {
    let state = Arc::new(ManagerState::new());
    let id = DatasetId::new();
    state.track_computing(id, 4);

    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(state.clone(), rx));

    tx.send(bucket_ready(id, 1)).expect("send should succeed");
    tx.send(bucket_ready(id, 0)).expect("send should succeed");
    // Give the manager task a chance to drain both events.
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    assert_eq!(state.progress(id), 0.5, "max source seen is 1 out of 4");

    drop(tx);
    let _ = task.await;
}

#[tokio::test]
async fn dataset_computed_clears_computing_and_wakes_waiters() {
    let state = Arc::new(ManagerState::new());
    let id = DatasetId::new();
    state.track_computing(id, 1);

    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(state.clone(), rx));

    let notified = state.notified();
    tx.send(DriverEvent::DatasetComputed { dataset_id: id, fetched: false }).expect("send should succeed");
    notified.await;

    assert!(!state.is_computing(id));
    drop(tx);
    let _ = task.await;
}

#[tokio::test]
async fn job_failed_clears_computing_same_as_dataset_computed() {
    let state = Arc::new(ManagerState::new());
    let id = DatasetId::new();
    state.track_computing(id, 2);

    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(state.clone(), rx));

    let notified = state.notified();
    tx.send(DriverEvent::JobFailed { dataset_id: id, reason: "boom".into() }).expect("send should succeed");
    notified.await;

    assert!(!state.is_computing(id));
    drop(tx);
    let _ = task.await;
}
