// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::error::{ErrorObserver, InputError, StoreError};
use finboard::models::{Currency, NotificationKind, Transaction};
use finboard::repository::{NewTransaction, Repository};
use finboard::store::primary::{BUDGETS_KEY, CURRENCY_KEY, NOTIFICATIONS_KEY, TRANSACTIONS_KEY};
use finboard::store::{MemoryKvStore, SqliteKvStore};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_observer() -> (ErrorObserver, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let observer: ErrorObserver = Arc::new(move |_: &StoreError| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (observer, count)
}

fn setup() -> (Repository, MemoryKvStore) {
    let kv = MemoryKvStore::new();
    let repo = Repository::new(Box::new(kv.clone()), None);
    (repo, kv)
}

fn tx(id: &str, amount: i64) -> Transaction {
    Transaction {
        id: id.into(),
        merchant: format!("M-{}", id),
        category: "Food".into(),
        amount: Decimal::from(amount),
        currency: "USD".into(),
        timestamp: "2025-08-10T10:00:00.000Z".into(),
    }
}

#[test]
fn empty_store_yields_seed_and_same_cached_value() {
    let (mut repo, _kv) = setup();
    let first = repo.load_transactions();
    assert_eq!(first.len(), 2);
    let second = repo.load_transactions();
    assert!(Arc::ptr_eq(&first, &second));

    repo.save_transactions(vec![tx("a", -1)]);
    let third = repo.load_transactions();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), 1);
}

#[test]
fn save_then_load_round_trips() {
    let (mut repo, kv) = setup();
    let list = vec![tx("a", -10), tx("b", 25)];
    repo.save_transactions(list.clone());
    assert_eq!(*repo.load_transactions(), list);

    // and survives a reload from the primary
    repo.reset_caches();
    assert_eq!(*repo.load_transactions(), list);
    let raw: serde_json::Value = serde_json::from_str(&kv.raw(TRANSACTIONS_KEY).unwrap()).unwrap();
    assert!(raw[0]["amount"].is_number());
}

#[test]
fn loads_never_touch_the_store_after_first_read() {
    let (mut repo, kv) = setup();
    repo.load_budgets();
    let reads = kv.reads();
    kv.insert_raw(BUDGETS_KEY, "{\"overall\":999}");
    assert!(repo.load_budgets().is_empty());
    assert_eq!(kv.reads(), reads);
}

#[test]
fn corrupt_values_fall_back_and_are_reported() {
    let kv = MemoryKvStore::new();
    kv.insert_raw(TRANSACTIONS_KEY, "{oops");
    kv.insert_raw(NOTIFICATIONS_KEY, "42");
    kv.insert_raw(CURRENCY_KEY, "DOGE");
    let (observer, count) = counting_observer();
    let mut repo = Repository::with_observer(Box::new(kv), None, observer);

    assert_eq!(repo.load_transactions().len(), 2);
    assert!(repo.load_notifications().is_empty());
    assert_eq!(repo.load_currency(), Currency::Usd);
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn denied_writes_still_update_the_session() {
    let kv = MemoryKvStore::new();
    kv.deny_writes(true);
    let (observer, count) = counting_observer();
    let mut repo = Repository::with_observer(Box::new(kv.clone()), None, observer);

    repo.save_transactions(vec![tx("only", -3)]);
    assert_eq!(repo.load_transactions().len(), 1);
    assert_eq!(kv.raw(TRANSACTIONS_KEY), None);
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // nothing durable happened
    repo.reset_caches();
    assert_eq!(repo.load_transactions().len(), 2);
}

#[test]
fn every_kind_updates_its_cache_before_a_failing_write() {
    let kv = MemoryKvStore::new();
    kv.deny_writes(true);
    let (observer, count) = counting_observer();
    let mut repo = Repository::with_observer(Box::new(kv.clone()), None, observer);

    repo.set_budgets(Decimal::from(90), vec![("Food".to_string(), Decimal::from(30))]);
    repo.add_notification("kept in session", NotificationKind::Warning);
    repo.save_currency(Currency::Aud);

    assert_eq!(repo.load_budgets()["Food"], Decimal::from(30));
    assert_eq!(repo.load_notifications()[0].message, "kept in session");
    assert_eq!(repo.load_currency(), Currency::Aud);
    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert_eq!(kv.raw(BUDGETS_KEY), None);
    assert_eq!(kv.raw(NOTIFICATIONS_KEY), None);
}

#[test]
fn notification_collection_is_capped_newest_first() {
    let (mut repo, _kv) = setup();
    for i in 0..60 {
        repo.add_notification(&format!("m{}", i), NotificationKind::Info);
    }
    let list = repo.load_notifications();
    assert_eq!(list.len(), 50);
    assert_eq!(list[0].message, "m59");
    assert_eq!(list[49].message, "m10");
    assert!(list.iter().all(|n| !n.read));
}

#[test]
fn notifications_can_be_read_and_deleted() {
    let (mut repo, _kv) = setup();
    repo.add_notification("one", NotificationKind::Info);
    repo.add_notification("two", NotificationKind::Warning);
    assert_eq!(repo.unread_count(), 2);

    let two = repo.load_notifications()[0].id.clone();
    assert!(repo.mark_notification_read(&two));
    assert!(!repo.mark_notification_read(&two));
    assert_eq!(repo.unread_count(), 1);

    repo.mark_all_notifications_read();
    assert_eq!(repo.unread_count(), 0);
    assert_eq!(repo.load_notifications().len(), 2);

    assert!(repo.delete_notification(&two));
    assert!(!repo.delete_notification("missing"));
    let left = repo.load_notifications();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].message, "one");
}

#[test]
fn add_transaction_validates_and_coerces() {
    let (mut repo, _kv) = setup();
    let bad = |amount: &str| NewTransaction {
        amount: amount.into(),
        ..Default::default()
    };
    assert_eq!(repo.add_transaction(bad("abc")).unwrap_err(), InputError::InvalidAmount("abc".into()));
    assert_eq!(repo.add_transaction(bad("0")).unwrap_err(), InputError::ZeroAmount);
    assert_eq!(repo.add_transaction(bad("  ")).unwrap_err(), InputError::MissingAmount);
    assert_eq!(repo.load_transactions().len(), 2);

    repo.save_currency(Currency::Gbp);
    let t = repo
        .add_transaction(NewTransaction {
            merchant: " Bakery ".into(),
            amount: "4.20".into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(t.amount, Decimal::new(-420, 2));
    assert_eq!(t.category, "Other");
    assert_eq!(t.merchant, "Bakery");
    assert_eq!(t.currency, "GBP");
    assert!(t.id.starts_with("t_"));

    let list = repo.load_transactions();
    assert_eq!(list.len(), 3);
    assert_eq!(list[2], t);
}

#[test]
fn delete_transaction_by_id() {
    let (mut repo, _kv) = setup();
    assert!(repo.delete_transaction("t1"));
    assert!(!repo.delete_transaction("t1"));
    let ids: Vec<String> = repo.load_transactions().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, ["t2"]);
}

#[test]
fn budgets_are_replaced_wholesale() {
    let (mut repo, kv) = setup();
    repo.set_budgets(
        Decimal::from(200),
        [
            ("Food".to_string(), Decimal::from(50)),
            ("Travel".to_string(), Decimal::ZERO),
        ],
    );
    let b = repo.load_budgets();
    assert_eq!(b.len(), 2);
    assert_eq!(b["overall"], Decimal::from(200));
    assert!(!b.contains_key("Travel"));

    repo.set_budgets(Decimal::ZERO, Vec::new());
    let b = repo.load_budgets();
    assert_eq!(b.len(), 1);
    let raw: serde_json::Value = serde_json::from_str(&kv.raw(BUDGETS_KEY).unwrap()).unwrap();
    assert!(raw.get("Food").is_none());
}

#[test]
fn currency_is_stored_as_plain_code() {
    let (mut repo, kv) = setup();
    assert_eq!(repo.load_currency(), Currency::Usd);
    repo.save_currency(Currency::Eur);
    assert_eq!(kv.raw(CURRENCY_KEY).as_deref(), Some("EUR"));
    repo.reset_caches();
    assert_eq!(repo.load_currency(), Currency::Eur);
}

#[test]
fn sqlite_primary_persists_across_repositories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finboard.sqlite");
    {
        let conn = finboard::db::open_or_init(&path).unwrap();
        let mut repo = Repository::new(Box::new(SqliteKvStore::new(conn)), None);
        repo.save_transactions(vec![tx("kept", -7)]);
        repo.save_currency(Currency::Jpy);
    }
    let conn = finboard::db::open_or_init(&path).unwrap();
    let mut repo = Repository::new(Box::new(SqliteKvStore::new(conn)), None);
    assert_eq!(repo.load_transactions()[0].id, "kept");
    assert_eq!(repo.load_currency(), Currency::Jpy);
}

#[test]
fn sqlite_upsert_replaces_value() {
    use finboard::store::KeyValueStore;
    let kv = SqliteKvStore::new(finboard::db::open_in_memory().unwrap());
    assert_eq!(kv.get(NOTIFICATIONS_KEY).unwrap(), None);
    kv.set(NOTIFICATIONS_KEY, "[]").unwrap();
    kv.set(NOTIFICATIONS_KEY, "[1]").unwrap();
    assert_eq!(kv.get(NOTIFICATIONS_KEY).unwrap().as_deref(), Some("[1]"));
}
