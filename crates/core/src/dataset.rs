// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dataset/bucket data model.
//!
//! A [`Dataset`] is a `sources × splits` grid of [`Bucket`] cells. [`DatasetKind`]
//! distinguishes datasets whose buckets already exist (`FileData`, `LocalData`)
//! from datasets whose buckets are produced by tasks (`ComputedData`).

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashSet;

use crate::ids::DatasetId;

/// How a bucket's key/value stream is encoded on disk and over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BucketFormat {
    /// One pair per line: `hex(key) SP hex(value) NL`. Preserves byte-wise key order.
    #[default]
    HexText,
    /// Length-prefixed binary records: `u32 key_len, key, u32 val_len, val`.
    LengthPrefixedBinary,
}

impl BucketFormat {
    pub fn extension(self) -> &'static str {
        match self {
            BucketFormat::HexText => "hexfile",
            BucketFormat::LengthPrefixedBinary => "bin",
        }
    }
}

crate::simple_display! {
    BucketFormat {
        HexText => "hex",
        LengthPrefixedBinary => "binary",
    }
}

/// A single `(source, split)` cell of a dataset.
///
/// Invariant: a bucket has at most one writer over its lifetime. Once the
/// producing task reports completion, `url` is final and the bucket is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bucket {
    pub source: u32,
    pub split: u32,
    pub format: BucketFormat,
    /// Empty until the bucket has been written and is reachable over HTTP.
    pub url: Option<SmolStr>,
    /// Local filename, set once written by the task that owns this cell.
    pub filename: Option<SmolStr>,
}

impl Bucket {
    pub fn new(source: u32, split: u32, format: BucketFormat) -> Self {
        Self {
            source,
            split,
            format,
            url: None,
            filename: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none()
    }

    pub fn mark_ready(&mut self, url: impl Into<SmolStr>, filename: impl Into<SmolStr>) {
        self.url = Some(url.into());
        self.filename = Some(filename.into());
    }
}

/// The operation a [`ComputedData`] performs to turn its input into its buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    Map {
        mapper: SmolStr,
        partitioner: SmolStr,
    },
    Reduce {
        reducer: SmolStr,
    },
    ReduceMap {
        reducer: SmolStr,
        mapper: SmolStr,
        partitioner: SmolStr,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Map { .. } => "map",
            Operation::Reduce { .. } => "reduce",
            Operation::ReduceMap { .. } => "reducemap",
        }
    }
}

/// Dataset-kind-specific state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatasetKind {
    /// External input; buckets already carry URLs, nothing to compute.
    FileData,
    /// Produced in-process from an in-memory iterable and written locally.
    LocalData,
    /// To be produced by tasks.
    Computed(ComputedData),
}

/// State specific to a dataset that is produced by running tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedData {
    pub input_id: DatasetId,
    /// Number of tasks, always equal to `input.splits`.
    pub ntasks: u32,
    pub op: Operation,
    pub computing: bool,
    /// Whether buckets already contain fetched data rather than just URLs.
    pub fetched: bool,
}

/// A dataset: a `sources × splits` grid of buckets plus lifecycle flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub sources: u32,
    pub splits: u32,
    pub closed: bool,
    /// If true, backing files survive removal from the in-memory graph.
    pub permanent: bool,
    pub kind: DatasetKind,
    /// Grid of `sources * splits` buckets, row-major by source.
    buckets: Vec<Bucket>,
}

impl Dataset {
    pub fn new(id: DatasetId, sources: u32, splits: u32, kind: DatasetKind) -> Self {
        let mut buckets = Vec::with_capacity((sources * splits) as usize);
        for source in 0..sources {
            for split in 0..splits {
                buckets.push(Bucket::new(source, split, BucketFormat::default()));
            }
        }
        Self {
            id,
            sources,
            splits,
            closed: false,
            permanent: false,
            kind,
            buckets,
        }
    }

    fn index(&self, source: u32, split: u32) -> usize {
        debug_assert!(source < self.sources && split < self.splits);
        (source * self.splits + split) as usize
    }

    pub fn bucket(&self, source: u32, split: u32) -> &Bucket {
        &self.buckets[self.index(source, split)]
    }

    pub fn bucket_mut(&mut self, source: u32, split: u32) -> &mut Bucket {
        let idx = self.index(source, split);
        &mut self.buckets[idx]
    }

    /// Buckets for a single column (all sources at the given split).
    pub fn column(&self, split: u32) -> impl Iterator<Item = &Bucket> {
        (0..self.sources).map(move |source| self.bucket(source, split))
    }

    /// Buckets for a single row (all splits at the given source).
    pub fn row(&self, source: u32) -> impl Iterator<Item = &Bucket> {
        (0..self.splits).map(move |split| self.bucket(source, split))
    }

    pub fn as_computed(&self) -> Option<&ComputedData> {
        match &self.kind {
            DatasetKind::Computed(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_computed_mut(&mut self) -> Option<&mut ComputedData> {
        match &mut self.kind {
            DatasetKind::Computed(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_computing(&self) -> bool {
        self.as_computed().map(|c| c.computing).unwrap_or(false)
    }

    /// Deterministic relative path for a bucket file under the dataset's directory.
    pub fn bucket_path(&self, source: u32, split: u32, ext: &str) -> String {
        format!("source_{source}_split_{split}.{ext}")
    }

    /// Sources at which at least one bucket in `split` is non-empty.
    pub fn non_empty_sources(&self, split: u32) -> HashSet<u32> {
        self.column(split)
            .filter(|b| !b.is_empty())
            .map(|b| b.source)
            .collect()
    }

    /// The format this dataset's buckets are written in. Every bucket in a
    /// dataset is stamped with the same format at construction time, so any
    /// cell stands in for the whole grid.
    pub fn format(&self) -> BucketFormat {
        self.bucket(0, 0).format
    }
}
