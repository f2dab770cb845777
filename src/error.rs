// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;
use thiserror::Error;

/// Failures inside a storage backend. None of these reach repository callers;
/// they are handed to the [`ErrorObserver`] and otherwise dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt value under '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Record has no string 'id' field")]
    MissingKey,

    #[error("Structured store unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write denied: {0}")]
    WriteDenied(String),
}

/// Rejected user input; no record is created.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Amount is required")]
    MissingAmount,

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Amount must not be zero")]
    ZeroAmount,
}

/// Hook that sees every swallowed storage failure.
pub type ErrorObserver = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// Logs each failure and carries on.
pub fn log_observer() -> ErrorObserver {
    Arc::new(|err: &StoreError| {
        tracing::warn!(error = %err, "storage operation failed");
    })
}
