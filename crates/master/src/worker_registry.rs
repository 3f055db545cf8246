// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracks every worker the master has seen this job: address, signin cookie,
//! current assignment, and ping health. Owned exclusively by the master's
//! RPC handlers (see the module docs on `mr_scheduler::Runtime` for the
//! matching rule on the graph side).

use std::collections::HashMap;
use std::net::SocketAddr;

use mr_core::{Clock, DatasetId, WorkerId};
use smol_str::SmolStr;

use crate::error::MasterError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    Idle,
    Assigned { dataset_id: DatasetId, task_index: u32 },
    Lost,
}

struct WorkerInfo {
    cookie: SmolStr,
    addr: SocketAddr,
    status: WorkerStatus,
    last_seen: std::time::Instant,
    misses: u32,
}

pub struct WorkerRegistry<C: Clock> {
    workers: HashMap<WorkerId, WorkerInfo>,
    clock: C,
}

impl<C: Clock> WorkerRegistry<C> {
    pub fn new(clock: C) -> Self {
        Self { workers: HashMap::new(), clock }
    }

    /// Admit a new worker. Rejects a cookie already bound to a live worker,
    /// matching the `SigninRejected` disposition.
    pub fn signin(&mut self, cookie: SmolStr, addr: SocketAddr) -> Result<WorkerId, MasterError> {
        if self.workers.values().any(|w| w.cookie == cookie && w.status != WorkerStatus::Lost) {
            return Err(MasterError::SigninRejected(WorkerId::new(cookie.as_str())));
        }
        let id = WorkerId::new(format!("wkr-{}", nanoid::nanoid!(12)));
        self.workers.insert(
            id.clone(),
            WorkerInfo {
                cookie,
                addr,
                status: WorkerStatus::Idle,
                last_seen: self.clock.now(),
                misses: 0,
            },
        );
        Ok(id)
    }

    pub fn record_ping(&mut self, id: &WorkerId, cookie: &str) -> Result<(), MasterError> {
        let info = self.workers.get_mut(id).ok_or_else(|| MasterError::UnknownWorker(id.clone()))?;
        if info.cookie != cookie {
            return Err(MasterError::CookieMismatch(id.clone()));
        }
        info.last_seen = self.clock.now();
        info.misses = 0;
        Ok(())
    }

    pub fn addr(&self, id: &WorkerId) -> Option<SocketAddr> {
        self.workers.get(id).map(|w| w.addr)
    }

    pub fn status(&self, id: &WorkerId) -> Option<WorkerStatus> {
        self.workers.get(id).map(|w| w.status.clone())
    }

    pub fn assign(&mut self, id: &WorkerId, dataset_id: DatasetId, task_index: u32) {
        if let Some(w) = self.workers.get_mut(id) {
            w.status = WorkerStatus::Assigned { dataset_id, task_index };
        }
    }

    pub fn mark_idle(&mut self, id: &WorkerId) {
        if let Some(w) = self.workers.get_mut(id) {
            w.status = WorkerStatus::Idle;
        }
    }

    pub fn idle_worker(&self) -> Option<WorkerId> {
        self.workers
            .iter()
            .find(|(_, w)| w.status == WorkerStatus::Idle)
            .map(|(id, _)| id.clone())
    }

    pub fn last_seen(&self, id: &WorkerId) -> Option<std::time::Instant> {
        self.workers.get(id).map(|w| w.last_seen)
    }

    /// Snapshot of every non-lost worker's address and signin cookie, for
    /// the heartbeat loop to ping without holding the registry lock.
    pub fn live_workers(&self) -> Vec<(WorkerId, SocketAddr, SmolStr)> {
        self.workers
            .iter()
            .filter(|(_, w)| w.status != WorkerStatus::Lost)
            .map(|(id, w)| (id.clone(), w.addr, w.cookie.clone()))
            .collect()
    }

    /// Increment miss counters against `ping_interval` elapsed and declare
    /// any worker over `miss_limit` lost, returning its outstanding task (if
    /// any) so the caller can notify the scheduler.
    pub fn sweep(&mut self, miss_limit: u32) -> Vec<(WorkerId, Option<(DatasetId, u32)>)> {
        let mut lost = Vec::new();
        for (id, info) in self.workers.iter_mut() {
            if info.status == WorkerStatus::Lost {
                continue;
            }
            info.misses += 1;
            if info.misses > miss_limit {
                let outstanding = match info.status {
                    WorkerStatus::Assigned { dataset_id, task_index } => Some((dataset_id, task_index)),
                    _ => None,
                };
                info.status = WorkerStatus::Lost;
                lost.push((id.clone(), outstanding));
            }
        }
        lost
    }
}
