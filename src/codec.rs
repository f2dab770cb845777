// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Conversion between stored strings and the four record kinds.
//!
//! Decoders never fail: a missing or malformed value yields the kind's
//! default. The `try_` variants expose the reason so callers can report it.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{BudgetMap, Currency, Notification, Transaction};
use crate::utils::now_iso;

/// First-run fixture used whenever no usable transaction list is stored.
pub fn default_transactions() -> Vec<Transaction> {
    let now = now_iso();
    vec![
        Transaction {
            id: "t1".into(),
            merchant: "Starbucks".into(),
            category: "Food".into(),
            amount: Decimal::new(-1850, 2),
            currency: "USD".into(),
            timestamp: now.clone(),
        },
        Transaction {
            id: "t2".into(),
            merchant: "Uber".into(),
            category: "Transport".into(),
            amount: Decimal::new(-3200, 2),
            currency: "USD".into(),
            timestamp: now,
        },
    ]
}

fn corrupt(key: &str, reason: impl ToString) -> StoreError {
    StoreError::Corrupt {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn try_decode_transactions(key: &str, raw: &str) -> Result<Vec<Transaction>, StoreError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| corrupt(key, e))?;
    if !value.is_array() {
        return Err(corrupt(key, "expected a JSON array"));
    }
    serde_json::from_value(value).map_err(|e| corrupt(key, e))
}

pub fn try_decode_budgets(key: &str, raw: &str) -> Result<BudgetMap, StoreError> {
    serde_json::from_str(raw).map_err(|e| corrupt(key, e))
}

pub fn try_decode_notifications(key: &str, raw: &str) -> Result<Vec<Notification>, StoreError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| corrupt(key, e))?;
    if !value.is_array() {
        return Err(corrupt(key, "expected a JSON array"));
    }
    serde_json::from_value(value).map_err(|e| corrupt(key, e))
}

/// Currency is stored as a bare code, not JSON.
pub fn try_decode_currency(key: &str, raw: &str) -> Result<Currency, StoreError> {
    raw.trim().parse::<Currency>().map_err(|e| corrupt(key, e))
}

pub fn decode_transaction_list(raw: Option<&str>) -> Vec<Transaction> {
    raw.and_then(|r| try_decode_transactions("transactions", r).ok())
        .unwrap_or_else(default_transactions)
}

pub fn decode_budget_map(raw: Option<&str>) -> BudgetMap {
    raw.and_then(|r| try_decode_budgets("budgets", r).ok())
        .unwrap_or_default()
}

pub fn decode_notification_list(raw: Option<&str>) -> Vec<Notification> {
    raw.and_then(|r| try_decode_notifications("notifications", r).ok())
        .unwrap_or_default()
}

pub fn decode_currency_code(raw: Option<&str>) -> Currency {
    raw.and_then(|r| try_decode_currency("currency", r).ok())
        .unwrap_or_default()
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

pub fn encode_currency(currency: Currency) -> String {
    currency.code().to_string()
}
