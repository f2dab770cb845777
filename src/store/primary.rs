// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{ErrorObserver, StoreError};

/// Fixed keys in the primary store.
pub const TRANSACTIONS_KEY: &str = "finance_dashboard_transactions_v1";
pub const BUDGETS_KEY: &str = "finance_dashboard_budgets_v1";
pub const NOTIFICATIONS_KEY: &str = "finance_dashboard_notifications_v1";
pub const CURRENCY_KEY: &str = "finance_dashboard_currency_v1";

/// Fast string key/value backend.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// `conn` must already carry the `kv` table (see [`crate::db::open_or_init`]).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let v = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local store. Clones share contents, so a test can keep a handle
/// and inspect or tamper with what the repository wrote.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    data: Arc<Mutex<HashMap<String, String>>>,
    deny_writes: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a full or read-only store: every `set` fails.
    pub fn deny_writes(&self, deny: bool) {
        self.deny_writes.store(deny, Ordering::SeqCst);
    }

    /// Number of `get` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.lock().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.data.lock().insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.deny_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteDenied(format!("quota exceeded writing '{}'", key)));
        }
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The always-available primary. Reads and writes never raise: failures go to
/// the observer and look like "value absent" or "value unchanged".
pub struct SyncStore {
    backend: Box<dyn KeyValueStore>,
    observer: ErrorObserver,
}

impl SyncStore {
    pub fn new(backend: Box<dyn KeyValueStore>, observer: ErrorObserver) -> Self {
        Self { backend, observer }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(v) => v,
            Err(e) => {
                (self.observer)(&e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value) {
            (self.observer)(&e);
        }
    }
}
