// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for master <-> worker RPC, and the bucket file codec.
//!
//! RPC bodies are JSON carried over HTTP (see [`rpc`]); bucket files use a
//! pluggable pair codec (see [`codec`]) selected by [`mr_core::BucketFormat`].

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod error;
mod rpc;

pub use codec::{decode_pairs, encode_pairs, PairReader, PairWriter};
pub use error::ProtocolError;
pub use rpc::{
    AssignRequest, CancelRequest, PingRequest, SigninRequest, SigninResponse, TaskDescriptor,
    TaskDoneRequest, TaskFailedRequest, TaskOutput,
};
