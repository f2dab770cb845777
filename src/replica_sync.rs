// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Background writes to the replica.
//!
//! Each record kind gets one lane: a task that applies that kind's writes
//! strictly in submission order, so a clear-then-put-all can never interleave
//! with the next one. Every write carries the complete value for its kind,
//! which lets a lane drop queued writes that a newer one supersedes.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::error::{ErrorObserver, StoreError};
use crate::store::{Collection, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Transactions,
    Budgets,
    Notifications,
    Currency,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Transactions,
        RecordKind::Budgets,
        RecordKind::Notifications,
        RecordKind::Currency,
    ];

    pub fn collection(self) -> Collection {
        match self {
            RecordKind::Transactions => Collection::Transactions,
            RecordKind::Budgets => Collection::Budgets,
            RecordKind::Notifications => Collection::Notifications,
            RecordKind::Currency => Collection::Settings,
        }
    }
}

enum Write {
    /// Clear the collection, then put every record.
    Replace(Vec<Value>),
    /// Upsert a single record.
    Put(Value),
}

enum Job {
    Write(Write),
    Flush(oneshot::Sender<()>),
}

pub struct ReplicaSync {
    store: Arc<dyn RecordStore>,
    lanes: HashMap<RecordKind, mpsc::UnboundedSender<Job>>,
}

impl ReplicaSync {
    /// Start one lane per record kind on the current tokio runtime.
    pub fn spawn(store: Arc<dyn RecordStore>, observer: ErrorObserver) -> Result<Self, StoreError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| StoreError::Unavailable(format!("no async runtime: {}", e)))?;
        let mut lanes = HashMap::new();
        for kind in RecordKind::ALL {
            let (tx, rx) = mpsc::unbounded_channel();
            handle.spawn(run_lane(kind, store.clone(), observer.clone(), rx));
            lanes.insert(kind, tx);
        }
        Ok(Self { store, lanes })
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    pub fn replace(&self, kind: RecordKind, records: Vec<Value>) {
        self.submit(kind, Job::Write(Write::Replace(records)));
    }

    pub fn put(&self, kind: RecordKind, record: Value) {
        self.submit(kind, Job::Write(Write::Put(record)));
    }

    /// Wait until every write submitted so far has been applied or dropped.
    pub async fn flush(&self) {
        let mut waits = Vec::with_capacity(self.lanes.len());
        for kind in RecordKind::ALL {
            let (tx, rx) = oneshot::channel();
            self.submit(kind, Job::Flush(tx));
            waits.push(rx);
        }
        for rx in waits {
            let _ = rx.await;
        }
    }

    fn submit(&self, kind: RecordKind, job: Job) {
        if let Some(lane) = self.lanes.get(&kind) {
            if lane.send(job).is_err() {
                tracing::debug!(?kind, "replica lane closed, write dropped");
            }
        }
    }
}

async fn run_lane(
    kind: RecordKind,
    store: Arc<dyn RecordStore>,
    observer: ErrorObserver,
    mut rx: mpsc::UnboundedReceiver<Job>,
) {
    while let Some(first) = rx.recv().await {
        let mut latest = None;
        let mut waiters = Vec::new();
        let mut next = Some(first);
        while let Some(job) = next {
            match job {
                Job::Write(w) => latest = Some(w),
                Job::Flush(tx) => waiters.push(tx),
            }
            next = rx.try_recv().ok();
        }
        if let Some(write) = latest {
            if let Err(e) = apply(store.as_ref(), kind.collection(), write).await {
                observer(&e);
            } else {
                tracing::debug!(?kind, "replica write applied");
            }
        }
        for tx in waiters {
            let _ = tx.send(());
        }
    }
}

async fn apply(store: &dyn RecordStore, collection: Collection, write: Write) -> Result<(), StoreError> {
    match write {
        Write::Replace(records) => {
            store.clear(collection).await?;
            for record in records {
                store.put(collection, record).await?;
            }
        }
        Write::Put(record) => store.put(collection, record).await?,
    }
    Ok(())
}
