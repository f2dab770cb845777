// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The one read/write surface for transactions, budgets, notifications and
//! the currency preference.
//!
//! Each kind has an in-memory cache that is the value of record for the
//! session. `load_*` fills it from the primary store on first use; `save_*`
//! replaces it, writes the primary synchronously, then queues a replica write
//! without waiting for it.

use chrono::{DateTime, Local, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::budget::{check_budget_status, has_unread};
use crate::codec;
use crate::error::{log_observer, ErrorObserver, InputError, StoreError};
use crate::migrate::migrate_from_primary;
use crate::models::{
    BudgetMap, Category, Currency, Notification, NotificationKind, Transaction, NOTIFICATION_CAP,
    OVERALL,
};
use crate::replica_sync::{RecordKind, ReplicaSync};
use crate::store::primary::{BUDGETS_KEY, CURRENCY_KEY, NOTIFICATIONS_KEY, TRANSACTIONS_KEY};
use crate::store::replica::{singleton, BUDGETS_RECORD_ID, CURRENCY_RECORD_ID};
use crate::store::{Collection, KeyValueStore, RecordStore, SyncStore};
use crate::utils::{as_spending, new_id, now_iso, parse_amount};

/// User-entered transaction before validation.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub merchant: String,
    pub category: String,
    pub amount: String,
    /// Defaults to the currency preference.
    pub currency: Option<String>,
    /// Defaults to now.
    pub timestamp: Option<String>,
}

pub struct Repository {
    primary: SyncStore,
    replica: Option<ReplicaSync>,
    observer: ErrorObserver,
    transactions: Option<Arc<Vec<Transaction>>>,
    budgets: Option<Arc<BudgetMap>>,
    notifications: Option<Arc<Vec<Notification>>>,
    currency: Option<Currency>,
}

impl Repository {
    /// Failures are logged through `tracing`.
    pub fn new(primary: Box<dyn KeyValueStore>, replica: Option<Arc<dyn RecordStore>>) -> Self {
        Self::with_observer(primary, replica, log_observer())
    }

    /// `replica` is `None` when the runtime has no structured store. Replica
    /// lanes need a tokio runtime; without one the replica is dropped.
    pub fn with_observer(
        primary: Box<dyn KeyValueStore>,
        replica: Option<Arc<dyn RecordStore>>,
        observer: ErrorObserver,
    ) -> Self {
        let replica = replica.and_then(|store| match ReplicaSync::spawn(store, observer.clone()) {
            Ok(sync) => Some(sync),
            Err(e) => {
                observer(&e);
                None
            }
        });
        Self {
            primary: SyncStore::new(primary, observer.clone()),
            replica,
            observer,
            transactions: None,
            budgets: None,
            notifications: None,
            currency: None,
        }
    }

    pub fn has_replica(&self) -> bool {
        self.replica.is_some()
    }

    /// Raw primary value under `key`, bypassing the caches.
    pub fn primary_raw(&self, key: &str) -> Option<String> {
        self.primary.get(key)
    }

    pub fn replica_store(&self) -> Option<Arc<dyn RecordStore>> {
        self.replica.as_ref().map(ReplicaSync::store)
    }

    /// Startup: copy the primary into the replica, then prime the caches from
    /// the replica. Any replica failure is reported and otherwise ignored.
    pub async fn start(&mut self) {
        let Some(store) = self.replica.as_ref().map(ReplicaSync::store) else {
            tracing::debug!("no replica configured, using primary store only");
            return;
        };
        match migrate_from_primary(&self.primary, store.as_ref()).await {
            Ok(n) => tracing::debug!(records = n, "migrated primary store into replica"),
            Err(e) => self.report(&e),
        }
        if let Err(e) = self.prime(store.as_ref()).await {
            self.report(&e);
        }
    }

    async fn prime(&mut self, store: &dyn RecordStore) -> Result<(), StoreError> {
        let records = store.get_all(Collection::Transactions).await?;
        if !records.is_empty() {
            match serde_json::from_value::<Vec<Transaction>>(Value::Array(records)) {
                Ok(list) => {
                    self.mirror(TRANSACTIONS_KEY, &list);
                    self.transactions = Some(Arc::new(list));
                }
                Err(e) => self.report(&e.into()),
            }
        }

        if let Some(value) = store
            .get(Collection::Budgets, BUDGETS_RECORD_ID)
            .await?
            .and_then(|mut r| r.get_mut("value").map(Value::take))
            .filter(|v| !v.is_null())
        {
            match serde_json::from_value::<BudgetMap>(value) {
                Ok(budgets) => {
                    self.mirror(BUDGETS_KEY, &budgets);
                    self.budgets = Some(Arc::new(budgets));
                }
                Err(e) => self.report(&e.into()),
            }
        }

        let records = store.get_all(Collection::Notifications).await?;
        if !records.is_empty() {
            match serde_json::from_value::<Vec<Notification>>(Value::Array(records)) {
                Ok(mut list) => {
                    // Replica returns key order; restore newest first.
                    list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                    self.mirror(NOTIFICATIONS_KEY, &list);
                    self.notifications = Some(Arc::new(list));
                }
                Err(e) => self.report(&e.into()),
            }
        }

        if let Some(raw) = store
            .get(Collection::Settings, CURRENCY_RECORD_ID)
            .await?
            .and_then(|r| r.get("value").and_then(Value::as_str).map(str::to_string))
            .filter(|s| !s.is_empty())
        {
            match codec::try_decode_currency(CURRENCY_KEY, &raw) {
                Ok(currency) => {
                    self.primary.set(CURRENCY_KEY, &codec::encode_currency(currency));
                    self.currency = Some(currency);
                }
                Err(e) => self.report(&e),
            }
        }
        Ok(())
    }

    /// Wait for queued replica writes. Call before the process exits.
    pub async fn flush(&self) {
        if let Some(replica) = &self.replica {
            replica.flush().await;
        }
    }

    /// Forget every cache; the next load re-reads the primary.
    pub fn reset_caches(&mut self) {
        self.transactions = None;
        self.budgets = None;
        self.notifications = None;
        self.currency = None;
    }

    fn report(&self, err: &StoreError) {
        (self.observer)(err);
    }

    fn mirror<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match codec::encode(value) {
            Ok(raw) => self.primary.set(key, &raw),
            Err(e) => self.report(&e),
        }
    }

    fn replicate_list<T: Serialize>(&self, kind: RecordKind, items: &[T]) {
        let Some(replica) = &self.replica else {
            return;
        };
        match items.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>() {
            Ok(records) => replica.replace(kind, records),
            Err(e) => self.report(&e.into()),
        }
    }

    // ---- transactions ----

    pub fn load_transactions(&mut self) -> Arc<Vec<Transaction>> {
        if let Some(cached) = &self.transactions {
            return cached.clone();
        }
        let list = match self.primary.get(TRANSACTIONS_KEY) {
            None => codec::default_transactions(),
            Some(raw) => codec::try_decode_transactions(TRANSACTIONS_KEY, &raw).unwrap_or_else(|e| {
                self.report(&e);
                codec::default_transactions()
            }),
        };
        let list = Arc::new(list);
        self.transactions = Some(list.clone());
        list
    }

    /// `list` must be the complete collection.
    pub fn save_transactions(&mut self, list: Vec<Transaction>) {
        let list = Arc::new(list);
        self.transactions = Some(list.clone());
        self.mirror(TRANSACTIONS_KEY, list.as_slice());
        self.replicate_list(RecordKind::Transactions, list.as_slice());
    }

    /// Validate, append and persist a transaction. Positive amounts are
    /// recorded as spending.
    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction, InputError> {
        let amount = as_spending(parse_amount(&new.amount)?);
        let category = match new.category.trim() {
            "" => Category::Other.label().to_string(),
            c => c.to_string(),
        };
        let currency = match new.currency {
            Some(c) if !c.trim().is_empty() => c.trim().to_string(),
            _ => self.load_currency().code().to_string(),
        };
        let tx = Transaction {
            id: new_id("t"),
            merchant: new.merchant.trim().to_string(),
            category,
            amount,
            currency,
            timestamp: new.timestamp.unwrap_or_else(now_iso),
        };
        let mut list = (*self.load_transactions()).clone();
        list.push(tx.clone());
        self.save_transactions(list);
        Ok(tx)
    }

    /// Returns false if no transaction had `id`.
    pub fn delete_transaction(&mut self, id: &str) -> bool {
        let current = self.load_transactions();
        if !current.iter().any(|t| t.id == id) {
            return false;
        }
        let list: Vec<Transaction> = current.iter().filter(|t| t.id != id).cloned().collect();
        self.save_transactions(list);
        true
    }

    // ---- budgets ----

    pub fn load_budgets(&mut self) -> Arc<BudgetMap> {
        if let Some(cached) = &self.budgets {
            return cached.clone();
        }
        let budgets = match self.primary.get(BUDGETS_KEY) {
            None => BudgetMap::new(),
            Some(raw) => codec::try_decode_budgets(BUDGETS_KEY, &raw).unwrap_or_else(|e| {
                self.report(&e);
                BudgetMap::new()
            }),
        };
        let budgets = Arc::new(budgets);
        self.budgets = Some(budgets.clone());
        budgets
    }

    /// Replaces the whole map; nothing is merged.
    pub fn save_budgets(&mut self, budgets: BudgetMap) {
        let budgets = Arc::new(budgets);
        self.budgets = Some(budgets.clone());
        self.mirror(BUDGETS_KEY, budgets.as_ref());
        if let Some(replica) = &self.replica {
            match serde_json::to_value(budgets.as_ref()) {
                Ok(value) => replica.put(RecordKind::Budgets, singleton(BUDGETS_RECORD_ID, value)),
                Err(e) => self.report(&e.into()),
            }
        }
    }

    /// Build and save a complete map: `overall` is always stored, categories
    /// only when positive.
    pub fn set_budgets<I>(&mut self, overall: Decimal, categories: I)
    where
        I: IntoIterator<Item = (String, Decimal)>,
    {
        let mut budgets = BudgetMap::new();
        budgets.insert(OVERALL.to_string(), overall);
        for (category, amount) in categories {
            if amount > Decimal::ZERO && category != OVERALL {
                budgets.insert(category, amount);
            }
        }
        self.save_budgets(budgets);
    }

    // ---- notifications ----

    pub fn load_notifications(&mut self) -> Arc<Vec<Notification>> {
        if let Some(cached) = &self.notifications {
            return cached.clone();
        }
        let list = match self.primary.get(NOTIFICATIONS_KEY) {
            None => Vec::new(),
            Some(raw) => codec::try_decode_notifications(NOTIFICATIONS_KEY, &raw).unwrap_or_else(|e| {
                self.report(&e);
                Vec::new()
            }),
        };
        let list = Arc::new(list);
        self.notifications = Some(list.clone());
        list
    }

    /// `list` must be the complete collection, newest first.
    pub fn save_notifications(&mut self, list: Vec<Notification>) {
        let list = Arc::new(list);
        self.notifications = Some(list.clone());
        self.mirror(NOTIFICATIONS_KEY, list.as_slice());
        self.replicate_list(RecordKind::Notifications, list.as_slice());
    }

    /// Prepend an unread notification, keeping the newest [`NOTIFICATION_CAP`].
    pub fn add_notification(&mut self, message: &str, kind: NotificationKind) -> Arc<Vec<Notification>> {
        let current = self.load_notifications();
        let mut list = Vec::with_capacity(current.len() + 1);
        list.push(Notification {
            id: new_id("n"),
            message: message.to_string(),
            kind,
            timestamp: now_iso(),
            read: false,
        });
        list.extend(current.iter().cloned());
        list.truncate(NOTIFICATION_CAP);
        self.save_notifications(list);
        self.load_notifications()
    }

    pub fn delete_notification(&mut self, id: &str) -> bool {
        let current = self.load_notifications();
        if !current.iter().any(|n| n.id == id) {
            return false;
        }
        let list: Vec<Notification> = current.iter().filter(|n| n.id != id).cloned().collect();
        self.save_notifications(list);
        true
    }

    pub fn mark_notification_read(&mut self, id: &str) -> bool {
        let current = self.load_notifications();
        if !current.iter().any(|n| n.id == id && !n.read) {
            return false;
        }
        let list: Vec<Notification> = current
            .iter()
            .map(|n| Notification {
                read: n.read || n.id == id,
                ..n.clone()
            })
            .collect();
        self.save_notifications(list);
        true
    }

    pub fn mark_all_notifications_read(&mut self) {
        let list: Vec<Notification> = self
            .load_notifications()
            .iter()
            .map(|n| Notification {
                read: true,
                ..n.clone()
            })
            .collect();
        self.save_notifications(list);
    }

    pub fn unread_count(&mut self) -> usize {
        self.load_notifications().iter().filter(|n| !n.read).count()
    }

    // ---- currency ----

    pub fn load_currency(&mut self) -> Currency {
        if let Some(c) = self.currency {
            return c;
        }
        let currency = match self.primary.get(CURRENCY_KEY) {
            None => Currency::default(),
            Some(raw) => codec::try_decode_currency(CURRENCY_KEY, &raw).unwrap_or_else(|e| {
                self.report(&e);
                Currency::default()
            }),
        };
        self.currency = Some(currency);
        currency
    }

    pub fn save_currency(&mut self, currency: Currency) {
        self.currency = Some(currency);
        let code = codec::encode_currency(currency);
        self.primary.set(CURRENCY_KEY, &code);
        if let Some(replica) = &self.replica {
            replica.put(
                RecordKind::Currency,
                singleton(CURRENCY_RECORD_ID, Value::String(code)),
            );
        }
    }

    // ---- budget alerts ----

    /// Evaluate budgets against this month's spending and store each alert
    /// that is not already pending as an unread notification.
    pub fn refresh_budget_alerts(&mut self) -> Vec<Notification> {
        self.refresh_budget_alerts_at(&Local::now())
    }

    pub fn refresh_budget_alerts_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Vec<Notification> {
        let transactions = self.load_transactions();
        let budgets = self.load_budgets();
        let mut created = Vec::new();
        for alert in check_budget_status(&transactions, &budgets, now) {
            if has_unread(&self.load_notifications(), &alert.message) {
                continue;
            }
            let list = self.add_notification(&alert.message, alert.kind);
            if let Some(n) = list.first() {
                tracing::debug!(message = %n.message, kind = %n.kind, "budget alert raised");
                created.push(n.clone());
            }
        }
        created
    }
}
