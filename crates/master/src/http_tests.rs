use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::Json;
use mr_core::{Dataset, DatasetId, DatasetKind, FakeClock, WorkerId};
use mr_wire::{PingRequest, SigninRequest, TaskDoneRequest, TaskFailedRequest, TaskOutput};
use tokio::sync::mpsc;

use crate::config::MasterConfig;
use crate::state::MasterState;

fn fresh_state() -> MasterState<FakeClock> {
    let (tx, _rx) = mpsc::unbounded_channel();
    MasterState::new(MasterConfig::default(), FakeClock::default(), tx)
}

fn peer() -> SocketAddr {
    "127.0.0.1:9".parse().expect("valid addr")
}

#[tokio::test]
async fn signin_registers_a_worker_and_returns_its_id() {
    let state = fresh_state();
    let req = SigninRequest { cookie: "cookie-a".into(), port: 4000 };
    let resp = super::signin(State(state.clone()), ConnectInfo(peer()), Json(req))
        .await
        .expect("signin should succeed");
    assert!(resp.0.ok);
    let worker_id = resp.0.worker_id.expect("worker id present");
    assert!(state.workers.lock().addr(&WorkerId::new(worker_id.as_str())).is_some());
}

#[tokio::test]
async fn signin_rejects_a_cookie_already_in_use() {
    let state = fresh_state();
    let req = SigninRequest { cookie: "dup".into(), port: 4000 };
    super::signin(State(state.clone()), ConnectInfo(peer()), Json(req.clone()))
        .await
        .expect("first signin succeeds");
    let err = super::signin(State(state.clone()), ConnectInfo(peer()), Json(req))
        .await
        .expect_err("second signin with the same cookie is rejected");
    assert!(matches!(err, crate::error::MasterError::SigninRejected(_)));
}

#[tokio::test]
async fn ping_handler_always_accepts() {
    let state = fresh_state();
    let status = super::ping(State(state), Json(PingRequest { cookie: "x".into() })).await;
    assert_eq!(status, axum::http::StatusCode::OK);
}

#[tokio::test]
async fn task_done_marks_the_reporting_worker_idle() {
    let state = fresh_state();
    let req = SigninRequest { cookie: "c".into(), port: 4000 };
    let resp = super::signin(State(state.clone()), ConnectInfo(peer()), Json(req))
        .await
        .expect("signin succeeds");
    let worker_id = resp.0.worker_id.expect("worker id present");
    let dataset_id = DatasetId::new();
    {
        let mut runtime = state.runtime.lock();
        let dataset = Dataset::new(dataset_id, 1, 1, DatasetKind::LocalData);
        runtime.submit(dataset).expect("submitting a local dataset succeeds");
        runtime.close(dataset_id);
    }
    state.workers.lock().assign(&WorkerId::new(worker_id.as_str()), dataset_id, 0);

    let req = TaskDoneRequest {
        worker_id: worker_id.clone(),
        dataset_id,
        task_index: 0,
        outputs: vec![TaskOutput { split: 0, url: "http://127.0.0.1:4000/buckets/0".into() }],
    };
    let status = super::task_done(State(state.clone()), Json(req)).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(
        state.workers.lock().status(&WorkerId::new(worker_id.as_str())),
        Some(crate::worker_registry::WorkerStatus::Idle)
    );
}

#[tokio::test]
async fn task_failed_releases_the_worker_and_requeues_the_task() {
    let state = fresh_state();
    let req = SigninRequest { cookie: "c2".into(), port: 4001 };
    let resp = super::signin(State(state.clone()), ConnectInfo(peer()), Json(req))
        .await
        .expect("signin succeeds");
    let worker_id = resp.0.worker_id.expect("worker id present");

    let input_id = DatasetId::new();
    let dataset_id = DatasetId::new();
    {
        let mut runtime = state.runtime.lock();
        let mut input = Dataset::new(input_id, 1, 1, DatasetKind::LocalData);
        input.bucket_mut(0, 0).mark_ready("http://127.0.0.1:4001/buckets/0", "split_0");
        runtime.submit(input).expect("submitting a local dataset succeeds");
        let computed = mr_core::ComputedData {
            input_id,
            ntasks: 1,
            op: mr_core::Operation::Map { mapper: "noop".into(), partitioner: "hash".into() },
            computing: true,
            fetched: false,
        };
        let dataset = Dataset::new(dataset_id, 1, 1, DatasetKind::Computed(computed));
        runtime.submit(dataset).expect("submitting a computed dataset succeeds");
        assert_eq!(runtime.next_task(), Some((dataset_id, 0)));
    }
    state.workers.lock().assign(&WorkerId::new(worker_id.as_str()), dataset_id, 0);

    let req = TaskFailedRequest {
        worker_id: worker_id.clone(),
        dataset_id,
        task_index: 0,
        reason: "user function failed".into(),
    };
    let status = super::task_failed(State(state.clone()), Json(req)).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(
        state.workers.lock().status(&WorkerId::new(worker_id.as_str())),
        Some(crate::worker_registry::WorkerStatus::Idle)
    );
    assert_eq!(state.runtime.lock().next_task(), Some((dataset_id, 0)));
}
