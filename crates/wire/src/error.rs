// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors arising from RPC framing, bucket codecs, and message parsing.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed hex pair at line {line}: {reason}")]
    MalformedHex { line: usize, reason: String },

    #[error("truncated binary record at offset {offset}")]
    TruncatedBinaryRecord { offset: usize },

    #[error("unexpected message, connection treated as lost: {0}")]
    Unexpected(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
