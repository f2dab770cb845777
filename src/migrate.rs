// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-way copy of primary-store contents into the structured replica.
//!
//! Runs at startup before anything is read. The primary is never modified.
//! The first failure abandons the rest; records already written stay.

use serde_json::Value;

use crate::error::StoreError;
use crate::store::primary::{BUDGETS_KEY, CURRENCY_KEY, NOTIFICATIONS_KEY, TRANSACTIONS_KEY};
use crate::store::replica::{singleton, BUDGETS_RECORD_ID, CURRENCY_RECORD_ID};
use crate::store::{Collection, RecordStore, SyncStore};
use crate::utils::new_id;

/// Copy every stored kind into `replica`. Returns the number of records written.
pub async fn migrate_from_primary(
    primary: &SyncStore,
    replica: &dyn RecordStore,
) -> Result<usize, StoreError> {
    let mut written = 0;

    if let Some(raw) = primary.get(TRANSACTIONS_KEY).filter(|r| !r.is_empty()) {
        for record in keyed_records(TRANSACTIONS_KEY, &raw, "t")? {
            replica.put(Collection::Transactions, record).await?;
            written += 1;
        }
    }

    if let Some(raw) = primary.get(BUDGETS_KEY).filter(|r| !r.is_empty()) {
        let value: Value = serde_json::from_str(&raw)?;
        replica
            .put(Collection::Budgets, singleton(BUDGETS_RECORD_ID, value))
            .await?;
        written += 1;
    }

    if let Some(raw) = primary.get(NOTIFICATIONS_KEY).filter(|r| !r.is_empty()) {
        for record in keyed_records(NOTIFICATIONS_KEY, &raw, "n")? {
            replica.put(Collection::Notifications, record).await?;
            written += 1;
        }
    }

    if let Some(raw) = primary.get(CURRENCY_KEY).filter(|r| !r.is_empty()) {
        replica
            .put(
                Collection::Settings,
                singleton(CURRENCY_RECORD_ID, Value::String(raw)),
            )
            .await?;
        written += 1;
    }

    Ok(written)
}

/// Parse a stored JSON array, giving a fresh id to every object without one.
fn keyed_records(key: &str, raw: &str, prefix: &str) -> Result<Vec<Value>, StoreError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = parsed else {
        return Err(StoreError::Corrupt {
            key: key.to_string(),
            reason: "expected a JSON array".into(),
        });
    };
    Ok(items
        .into_iter()
        .map(|mut item| {
            if let Some(obj) = item.as_object_mut() {
                let has_id = obj
                    .get("id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| !id.is_empty());
                if !has_id {
                    obj.insert("id".into(), Value::String(new_id(prefix)));
                }
            }
            item
        })
        .collect())
}
