// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{compute_monthly_total, in_month};
use crate::models::Category;
use crate::repository::{NewTransaction, Repository};
use crate::utils::{format_currency, maybe_print_json, pretty_table};
use anyhow::{anyhow, Result};
use chrono::Local;
use serde::Serialize;

pub fn handle(repo: &mut Repository, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(repo, sub)?,
        Some(("list", sub)) => list(repo, sub)?,
        Some(("delete", sub)) => delete(repo, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(repo: &mut Repository, sub: &clap::ArgMatches) -> Result<()> {
    let arg = |name: &str| sub.get_one::<String>(name).cloned();
    let new = NewTransaction {
        merchant: arg("merchant").unwrap_or_default(),
        category: arg("category").unwrap_or_default(),
        amount: arg("amount").unwrap_or_default(),
        currency: arg("currency").map(|c| c.to_uppercase()),
        timestamp: arg("timestamp"),
    };
    let tx = repo.add_transaction(new)?;
    println!(
        "Recorded {} at '{}' ({}) id={}",
        format_currency(tx.amount, &tx.currency),
        tx.merchant,
        tx.category,
        tx.id
    );
    Ok(())
}

fn delete(repo: &mut Repository, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("id is required"))?;
    if !repo.delete_transaction(id) {
        return Err(anyhow!("Transaction '{}' not found", id));
    }
    println!("Deleted transaction {}", id);
    Ok(())
}

fn list(repo: &mut Repository, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(repo, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.timestamp.clone(),
                    r.merchant.clone(),
                    Category::display(&r.category),
                    r.display_amount.clone(),
                    r.currency.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["When", "Merchant", "Category", "Amount", "CCY", "Id"],
                rows,
            )
        );
        let currency = repo.load_currency();
        let category = sub.get_one::<String>("category");
        let txs = repo.load_transactions();
        let scoped: Vec<_> = txs
            .iter()
            .filter(|t| category.is_none_or(|c| t.category_or_other() == c.as_str()))
            .cloned()
            .collect();
        let total = compute_monthly_total(&scoped, &Local::now());
        println!("This month: {}", format_currency(total, currency.code()));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub timestamp: String,
    pub merchant: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    /// Amount rendered in the preferred display currency.
    #[serde(skip)]
    pub display_amount: String,
}

/// Newest first, filtered by `--category`, `--month` and `--limit`.
pub fn query_rows(repo: &mut Repository, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let display = repo.load_currency();
    let txs = repo.load_transactions();
    let now = Local::now();
    let category = sub.get_one::<String>("category");
    let this_month = sub.get_flag("month");

    let mut selected: Vec<_> = txs
        .iter()
        .filter(|t| category.is_none_or(|c| t.category_or_other() == c.as_str()))
        .filter(|t| !this_month || in_month(t, &now))
        .collect();
    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        selected.truncate(*limit);
    }

    Ok(selected
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            timestamp: t.timestamp.clone(),
            merchant: if t.merchant.is_empty() {
                "Unknown".to_string()
            } else {
                t.merchant.clone()
            },
            category: t.category_or_other().to_string(),
            amount: t.amount.to_string(),
            currency: t.currency.clone(),
            display_amount: format_currency(t.amount, display.code()),
        })
        .collect())
}
