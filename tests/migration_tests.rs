// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::error::log_observer;
use finboard::migrate::migrate_from_primary;
use finboard::models::Currency;
use finboard::repository::Repository;
use finboard::store::primary::{BUDGETS_KEY, CURRENCY_KEY, NOTIFICATIONS_KEY, TRANSACTIONS_KEY};
use finboard::store::{Collection, MemoryKvStore, MemoryRecordStore, SyncStore};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

const TXS: &str = r#"[{"id":"t9","merchant":"A","category":"Food","amount":-4,"currency":"USD","timestamp":"2025-08-01T00:00:00.000Z"},{"merchant":"B","category":"Bills","amount":-9,"currency":"USD","timestamp":"2025-08-02T00:00:00.000Z"}]"#;

fn seeded_primary() -> MemoryKvStore {
    let kv = MemoryKvStore::new();
    kv.insert_raw(TRANSACTIONS_KEY, TXS);
    kv.insert_raw(BUDGETS_KEY, r#"{"overall":150}"#);
    kv.insert_raw(
        NOTIFICATIONS_KEY,
        r#"[{"message":"m","type":"info","timestamp":"2025-08-01T00:00:00.000Z","read":false}]"#,
    );
    kv.insert_raw(CURRENCY_KEY, "CAD");
    kv
}

#[tokio::test]
async fn copies_every_kind_and_assigns_missing_ids() {
    let kv = seeded_primary();
    let primary = SyncStore::new(Box::new(kv.clone()), log_observer());
    let replica = MemoryRecordStore::new();

    let written = migrate_from_primary(&primary, &replica).await.unwrap();
    assert_eq!(written, 5);

    let txs = replica.snapshot(Collection::Transactions);
    assert_eq!(txs.len(), 2);
    assert!(txs.iter().any(|t| t["id"] == "t9"));
    assert!(txs
        .iter()
        .any(|t| t["merchant"] == "B" && t["id"].as_str().unwrap().starts_with("t_")));
    assert!(replica.snapshot(Collection::Notifications)[0]["id"]
        .as_str()
        .unwrap()
        .starts_with("n_"));
    assert_eq!(
        replica.snapshot(Collection::Budgets),
        vec![json!({"id": "budgets", "value": {"overall": 150}})]
    );
    assert_eq!(
        replica.snapshot(Collection::Settings),
        vec![json!({"id": "currency", "value": "CAD"})]
    );

    // the primary is untouched
    assert_eq!(kv.raw(TRANSACTIONS_KEY).as_deref(), Some(TXS));
}

#[tokio::test]
async fn migration_is_idempotent() {
    let kv = seeded_primary();
    kv.insert_raw(NOTIFICATIONS_KEY, "[]");
    let primary = SyncStore::new(Box::new(kv), log_observer());
    let replica = MemoryRecordStore::new();

    migrate_from_primary(&primary, &replica).await.unwrap();
    migrate_from_primary(&primary, &replica).await.unwrap();
    // "t9" keeps its id; the id-less record gets a fresh one each run
    let txs = replica.snapshot(Collection::Transactions);
    assert_eq!(txs.iter().filter(|t| t["id"] == "t9").count(), 1);
    assert_eq!(replica.snapshot(Collection::Budgets).len(), 1);
}

#[tokio::test]
async fn corrupt_input_abandons_the_rest() {
    let kv = seeded_primary();
    kv.insert_raw(TRANSACTIONS_KEY, "{\"not\":\"a list\"}");
    let primary = SyncStore::new(Box::new(kv), log_observer());
    let replica = MemoryRecordStore::new();

    assert!(migrate_from_primary(&primary, &replica).await.is_err());
    assert!(replica.snapshot(Collection::Budgets).is_empty());
    assert!(replica.snapshot(Collection::Settings).is_empty());
}

#[tokio::test]
async fn start_primes_caches_from_replica_and_mirrors_primary() {
    let kv = MemoryKvStore::new();
    let replica = MemoryRecordStore::new();
    {
        use finboard::store::RecordStore;
        replica
            .put(
                Collection::Transactions,
                json!({"id":"r1","merchant":"R","category":"Travel","amount":-70,"currency":"USD","timestamp":"2025-08-01T00:00:00.000Z"}),
            )
            .await
            .unwrap();
        for (id, ts) in [("n_1", "2025-08-01T00:00:00.000Z"), ("n_2", "2025-08-03T00:00:00.000Z")] {
            replica
                .put(
                    Collection::Notifications,
                    json!({"id": id, "message": id, "type": "info", "timestamp": ts, "read": false}),
                )
                .await
                .unwrap();
        }
        replica
            .put(Collection::Settings, json!({"id": "currency", "value": "AUD"}))
            .await
            .unwrap();
        replica
            .put(Collection::Budgets, json!({"id": "budgets", "value": {"Travel": 60}}))
            .await
            .unwrap();
    }

    let mut repo = Repository::new(Box::new(kv.clone()), Some(Arc::new(replica.clone())));
    repo.start().await;

    assert_eq!(repo.load_transactions()[0].id, "r1");
    assert_eq!(repo.load_budgets()["Travel"], Decimal::from(60));
    assert_eq!(repo.load_currency(), Currency::Aud);
    let notes = repo.load_notifications();
    assert_eq!(notes[0].id, "n_2");
    assert_eq!(notes[1].id, "n_1");

    assert!(kv.raw(TRANSACTIONS_KEY).unwrap().contains("\"r1\""));
    assert_eq!(kv.raw(CURRENCY_KEY).as_deref(), Some("AUD"));
}

#[tokio::test]
async fn start_with_broken_replica_falls_back_to_primary() {
    let kv = seeded_primary();
    let replica = MemoryRecordStore::new();
    replica.set_unavailable(true);
    let mut repo = Repository::new(Box::new(kv), Some(Arc::new(replica)));
    repo.start().await;

    assert_eq!(repo.load_transactions().len(), 2);
    assert_eq!(repo.load_currency(), Currency::Cad);
    assert_eq!(repo.load_budgets()["overall"], Decimal::from(150));
}
