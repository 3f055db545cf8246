// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The function registry: a two-way name/function mapping the driver and
//! every worker build identically at process start, so the wire protocol
//! can carry function *names* instead of serialized closures (see
//! `Operation`, whose `mapper`/`reducer`/`partitioner` fields are names
//! resolved through a [`Registry`] built this way on both sides).

use std::collections::HashMap;
use std::sync::Arc;

/// `mapper(key, value) -> iterable<(k', v')>`, generator-like so a mapper
/// that emits many pairs per input never has to buffer them all.
pub type MapFn = dyn Fn(&[u8], &[u8]) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)>> + Send + Sync;

/// `reducer(key, values) -> iterable<v'>`.
pub type ReduceFn = dyn Fn(&[u8], &mut dyn Iterator<Item = Vec<u8>>) -> Box<dyn Iterator<Item = Vec<u8>>>
    + Send
    + Sync;

/// `partitioner(key, n) -> split in [0, n)`. Must be a pure function of its
/// arguments: the same key and split count always yield the same split,
/// across processes and across runs.
pub type PartitionFn = dyn Fn(&[u8], u32) -> u32 + Send + Sync;

/// Name-keyed table of mapper, reducer, and partitioner functions. Built
/// once by the user program and shared, by construction, between the
/// driver process and every worker process (they all run the same binary).
#[derive(Clone, Default)]
pub struct Registry {
    mappers: HashMap<String, Arc<MapFn>>,
    reducers: HashMap<String, Arc<ReduceFn>>,
    partitioners: HashMap<String, Arc<PartitionFn>>,
}

impl Registry {
    /// A registry with the built-in `"hash"` partitioner pre-registered.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_partitioner("hash", hash_partition);
        registry
    }

    pub fn register_mapper(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&[u8], &[u8]) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)>> + Send + Sync + 'static,
    ) -> &mut Self {
        self.mappers.insert(name.into(), Arc::new(f));
        self
    }

    pub fn register_reducer(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&[u8], &mut dyn Iterator<Item = Vec<u8>>) -> Box<dyn Iterator<Item = Vec<u8>>> + Send + Sync + 'static,
    ) -> &mut Self {
        self.reducers.insert(name.into(), Arc::new(f));
        self
    }

    pub fn register_partitioner(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&[u8], u32) -> u32 + Send + Sync + 'static,
    ) -> &mut Self {
        self.partitioners.insert(name.into(), Arc::new(f));
        self
    }

    pub fn mapper(&self, name: &str) -> Option<Arc<MapFn>> {
        self.mappers.get(name).cloned()
    }

    pub fn reducer(&self, name: &str) -> Option<Arc<ReduceFn>> {
        self.reducers.get(name).cloned()
    }

    pub fn partitioner(&self, name: &str) -> Option<Arc<PartitionFn>> {
        self.partitioners.get(name).cloned()
    }

    pub fn has_mapper(&self, name: &str) -> bool {
        self.mappers.contains_key(name)
    }

    pub fn has_reducer(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    pub fn has_partitioner(&self, name: &str) -> bool {
        self.partitioners.contains_key(name)
    }
}

/// FNV-1a over the key bytes, modulo the split count. Deterministic across
/// processes and runs, which is all the partitioning contract requires.
pub fn hash_partition(key: &[u8], n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in key {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % n as u64) as u32
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
