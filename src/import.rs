// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! External one-shot transaction import (e.g. a shortcut opening a URL with
//! `?amount=12.50&merchant=Cafe`).

use anyhow::{Context, Result};
use std::collections::HashMap;
use url::Url;

use crate::error::InputError;
use crate::models::{Category, NotificationKind, Transaction};
use crate::repository::{NewTransaction, Repository};
use crate::utils::format_currency;

/// Pending import parameters. Cleared once imported so a re-delivered
/// trigger cannot add the same transaction twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTrigger {
    params: HashMap<String, String>,
}

impl ImportTrigger {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Parameters from a URL's query string.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url.trim()).with_context(|| format!("Invalid URL '{}'", url))?;
        Ok(Self::from_pairs(parsed.query_pairs().into_owned()))
    }

    /// Parameters from `key=value` items.
    pub fn from_assignments<S: AsRef<str>>(items: &[S]) -> Result<Self> {
        let mut pairs = Vec::with_capacity(items.len());
        for item in items {
            let item = item.as_ref();
            let (k, v) = item
                .split_once('=')
                .with_context(|| format!("Expected key=value, got '{}'", item))?;
            pairs.push((k.trim().to_string(), v.trim().to_string()));
        }
        Ok(Self::from_pairs(pairs))
    }

    pub fn is_pending(&self) -> bool {
        self.params.contains_key("amount")
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }
}

/// Import the pending transaction, announce it, and acknowledge the trigger.
/// Returns `Ok(None)` when nothing is pending; invalid input leaves the
/// trigger untouched and stores nothing.
pub fn consume(
    repo: &mut Repository,
    trigger: &mut ImportTrigger,
) -> Result<Option<Transaction>, InputError> {
    if !trigger.is_pending() {
        return Ok(None);
    }
    let merchant = trigger
        .param("merchant")
        .or_else(|| trigger.param("name"))
        .unwrap_or("Imported")
        .to_string();
    let new = NewTransaction {
        merchant,
        category: trigger
            .param("category")
            .unwrap_or(Category::Other.label())
            .to_string(),
        amount: trigger.param("amount").unwrap_or_default().to_string(),
        currency: trigger.param("currency").map(str::to_string),
        timestamp: trigger.param("timestamp").map(str::to_string),
    };
    let tx = repo.add_transaction(new)?;
    repo.add_notification(
        &format!(
            "Imported: {} {}",
            tx.merchant,
            format_currency(tx.amount, &tx.currency)
        ),
        NotificationKind::Info,
    );
    trigger.clear();
    tracing::info!(id = %tx.id, merchant = %tx.merchant, "imported transaction");
    Ok(Some(tx))
}
