// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::commands::doctor::diagnose;
use finboard::repository::Repository;
use finboard::store::primary::{BUDGETS_KEY, CURRENCY_KEY, TRANSACTIONS_KEY};
use finboard::store::{Collection, MemoryKvStore, MemoryRecordStore, RecordStore};
use serde_json::json;
use std::sync::Arc;

fn tx_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "merchant": "M",
        "category": "Food",
        "amount": -1,
        "currency": "USD",
        "timestamp": "2025-08-01T00:00:00.000Z"
    })
}

#[tokio::test]
async fn reports_corrupt_primary_and_replica_drift() {
    let kv = MemoryKvStore::new();
    kv.insert_raw(
        TRANSACTIONS_KEY,
        &serde_json::to_string(&vec![tx_json("a"), tx_json("b")]).unwrap(),
    );
    kv.insert_raw(BUDGETS_KEY, r#"{"overall":100}"#);
    kv.insert_raw(CURRENCY_KEY, "XYZ");

    let replica = MemoryRecordStore::new();
    for id in ["b", "c"] {
        replica.put(Collection::Transactions, tx_json(id)).await.unwrap();
    }
    replica
        .put(Collection::Budgets, json!({"id": "budgets", "value": {"overall": 50}}))
        .await
        .unwrap();

    let repo = Repository::new(Box::new(kv), Some(Arc::new(replica)));
    let rows = diagnose(&repo).await;

    let kinds: Vec<(&str, &str)> = rows.iter().map(|r| (r[0].as_str(), r[1].as_str())).collect();
    assert_eq!(kinds.len(), 5);
    assert_eq!(kinds[0].0, "corrupt_primary");
    assert!(kinds[0].1.contains(CURRENCY_KEY));
    assert_eq!(
        &kinds[1..],
        [
            ("replica_missing", "transactions/a"),
            ("replica_extra", "transactions/c"),
            ("replica_stale", "budgets/budgets"),
            ("replica_stale", "settings/currency"),
        ]
    );
}

#[tokio::test]
async fn consistent_stores_report_nothing() {
    let kv = MemoryKvStore::new();
    kv.insert_raw(TRANSACTIONS_KEY, &serde_json::to_string(&vec![tx_json("a")]).unwrap());
    kv.insert_raw(CURRENCY_KEY, "EUR");
    let replica = MemoryRecordStore::new();
    replica.put(Collection::Transactions, tx_json("a")).await.unwrap();
    replica
        .put(Collection::Settings, json!({"id": "currency", "value": "EUR"}))
        .await
        .unwrap();

    let repo = Repository::new(Box::new(kv), Some(Arc::new(replica)));
    assert!(diagnose(&repo).await.is_empty());
}

#[tokio::test]
async fn unavailable_replica_is_reported() {
    let replica = MemoryRecordStore::new();
    replica.set_unavailable(true);
    let repo = Repository::new(Box::new(MemoryKvStore::new()), Some(Arc::new(replica)));
    let rows = diagnose(&repo).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "replica_unavailable");
}

#[test]
fn primary_only_checks_decoding() {
    let kv = MemoryKvStore::new();
    kv.insert_raw(BUDGETS_KEY, "not json");
    let repo = Repository::new(Box::new(kv), None);
    let rows = tokio::runtime::Runtime::new().unwrap().block_on(diagnose(&repo));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "corrupt_primary");
}
