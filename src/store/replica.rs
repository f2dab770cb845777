// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::StoreError;

/// Synthetic ids for the singleton records.
pub const BUDGETS_RECORD_ID: &str = "budgets";
pub const CURRENCY_RECORD_ID: &str = "currency";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
    Notifications,
    Settings,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Budgets => "budgets",
            Collection::Notifications => "notifications",
            Collection::Settings => "settings",
        }
    }
}

/// Optional structured backend: four collections of JSON records keyed by
/// their `id` field. Every call may fail; callers treat failure as a no-op.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError>;
    async fn put(&self, collection: Collection, record: Value) -> Result<(), StoreError>;
    async fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError>;
    async fn clear(&self, collection: Collection) -> Result<(), StoreError>;
}

pub fn record_id(record: &Value) -> Result<String, StoreError> {
    record
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StoreError::MissingKey)
}

/// Wrap a non-record value as `{id, value}`.
pub fn singleton(id: &str, value: Value) -> Value {
    serde_json::json!({ "id": id, "value": value })
}

/// One JSON file per record under `<root>/<collection>/`.
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn dir(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.name())
    }

    fn file(&self, collection: Collection, key: &str) -> PathBuf {
        self.dir(collection)
            .join(format!("{}.json", urlencoding::encode(key)))
    }
}

fn not_found_ok(res: std::io::Result<()>) -> Result<(), StoreError> {
    match res {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

async fn read_record(path: &Path) -> Result<Value, StoreError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl RecordStore for FsRecordStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let mut entries = match tokio::fs::read_dir(self.dir(collection)).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut out = BTreeMap::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let record = read_record(&path).await?;
            out.insert(record_id(&record)?, record);
        }
        Ok(out.into_values().collect())
    }

    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError> {
        match read_record(&self.file(collection, key)).await {
            Ok(v) => Ok(Some(v)),
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn put(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        let id = record_id(&record)?;
        tokio::fs::create_dir_all(self.dir(collection)).await?;
        let path = self.file(collection, &id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(&record)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        not_found_ok(tokio::fs::remove_file(self.file(collection, key)).await)
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        not_found_ok(tokio::fs::remove_dir_all(self.dir(collection)).await)
    }
}

/// In-process replica. Clones share state; it can be made unavailable or slow.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    data: Arc<Mutex<HashMap<Collection, BTreeMap<String, Value>>>>,
    unavailable: Arc<AtomicBool>,
    latency: Arc<Mutex<Duration>>,
    calls: Arc<AtomicUsize>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call rejects while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay applied before each write.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Records in key order without going through the async API.
    pub fn snapshot(&self, collection: Collection) -> Vec<Value> {
        self.data
            .lock()
            .get(&collection)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory replica switched off".into()));
        }
        Ok(())
    }

    async fn delay(&self) {
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        Ok(self.snapshot(collection))
    }

    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError> {
        self.check()?;
        Ok(self
            .data
            .lock()
            .get(&collection)
            .and_then(|m| m.get(key).cloned()))
    }

    async fn put(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        self.check()?;
        let id = record_id(&record)?;
        self.delay().await;
        self.data
            .lock()
            .entry(collection)
            .or_default()
            .insert(id, record);
        Ok(())
    }

    async fn delete(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.delay().await;
        if let Some(m) = self.data.lock().get_mut(&collection) {
            m.remove(key);
        }
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.check()?;
        self.delay().await;
        self.data.lock().remove(&collection);
        Ok(())
    }
}
