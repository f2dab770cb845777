// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::codec;
use crate::repository::Repository;
use crate::store::primary::{BUDGETS_KEY, CURRENCY_KEY, NOTIFICATIONS_KEY, TRANSACTIONS_KEY};
use crate::store::replica::{record_id, BUDGETS_RECORD_ID, CURRENCY_RECORD_ID};
use crate::store::{Collection, RecordStore};
use crate::utils::pretty_table;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeSet;

pub async fn handle(repo: &Repository) -> Result<()> {
    let rows = diagnose(repo).await;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Issues as (kind, detail) rows. Waits for pending replica writes first.
pub async fn diagnose(repo: &Repository) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Primary values that would be replaced by defaults on load
    let txs = repo.primary_raw(TRANSACTIONS_KEY);
    let budgets = repo.primary_raw(BUDGETS_KEY);
    let notifs = repo.primary_raw(NOTIFICATIONS_KEY);
    let currency = repo.primary_raw(CURRENCY_KEY);
    let checks = [
        txs.as_deref()
            .map(|r| codec::try_decode_transactions(TRANSACTIONS_KEY, r).map(|_| ())),
        budgets
            .as_deref()
            .map(|r| codec::try_decode_budgets(BUDGETS_KEY, r).map(|_| ())),
        notifs
            .as_deref()
            .map(|r| codec::try_decode_notifications(NOTIFICATIONS_KEY, r).map(|_| ())),
        currency
            .as_deref()
            .map(|r| codec::try_decode_currency(CURRENCY_KEY, r).map(|_| ())),
    ];
    for err in checks.into_iter().flatten().filter_map(Result::err) {
        rows.push(vec!["corrupt_primary".into(), err.to_string()]);
    }

    // 2) Replica drift against the primary
    let Some(store) = repo.replica_store() else {
        return rows;
    };
    repo.flush().await;

    for (collection, raw) in [
        (Collection::Transactions, txs.as_deref()),
        (Collection::Notifications, notifs.as_deref()),
    ] {
        let primary_ids = ids_in(raw);
        match replica_ids(store.as_ref(), collection).await {
            Ok(replica) => {
                for id in primary_ids.difference(&replica) {
                    rows.push(vec![
                        "replica_missing".into(),
                        format!("{}/{}", collection.name(), id),
                    ]);
                }
                for id in replica.difference(&primary_ids) {
                    rows.push(vec![
                        "replica_extra".into(),
                        format!("{}/{}", collection.name(), id),
                    ]);
                }
            }
            Err(e) => {
                rows.push(vec!["replica_unavailable".into(), e.to_string()]);
                return rows;
            }
        }
    }

    let singletons = [
        (
            Collection::Budgets,
            BUDGETS_RECORD_ID,
            budgets.as_deref().and_then(|r| serde_json::from_str::<Value>(r).ok()),
        ),
        (
            Collection::Settings,
            CURRENCY_RECORD_ID,
            currency.map(Value::String),
        ),
    ];
    for (collection, id, expected) in singletons {
        match store.get(collection, id).await {
            Ok(record) => {
                let actual = record.and_then(|mut r| r.get_mut("value").map(Value::take));
                if actual != expected {
                    rows.push(vec![
                        "replica_stale".into(),
                        format!("{}/{}", collection.name(), id),
                    ]);
                }
            }
            Err(e) => {
                rows.push(vec!["replica_unavailable".into(), e.to_string()]);
                break;
            }
        }
    }
    rows
}

fn ids_in(raw: Option<&str>) -> BTreeSet<String> {
    raw.and_then(|r| serde_json::from_str::<Vec<Value>>(r).ok())
        .unwrap_or_default()
        .iter()
        .filter_map(|v| record_id(v).ok())
        .collect()
}

async fn replica_ids(
    store: &dyn RecordStore,
    collection: Collection,
) -> Result<BTreeSet<String>, crate::error::StoreError> {
    Ok(store
        .get_all(collection)
        .await?
        .iter()
        .filter_map(|v| record_id(v).ok())
        .collect())
}
