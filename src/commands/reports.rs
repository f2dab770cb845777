// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{compute_category_totals, monthly_transactions, percent_of, total};
use crate::models::Category;
use crate::repository::Repository;
use crate::utils::{fmt2, format_currency, maybe_print_json, pretty_table, round_half_up};
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub month: String,
    pub total: Decimal,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub spent: Decimal,
    pub share: Decimal,
}

pub fn handle(repo: &mut Repository, m: &clap::ArgMatches) -> Result<()> {
    let report = build(repo, &Local::now());
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let symbol = repo.load_currency().symbol();
    let rows = report
        .categories
        .iter()
        .map(|c| {
            vec![
                Category::display(&c.category),
                format!("{}{}", symbol, fmt2(c.spent)),
                format!("{:.0}%", round_half_up(c.share, 0)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    println!(
        "{} total: {}",
        report.month,
        format_currency(report.total, repo.load_currency().code())
    );
    Ok(())
}

/// Signed total and per-category absolute totals for `now`'s month, largest first.
pub fn build<Tz: TimeZone>(repo: &mut Repository, now: &DateTime<Tz>) -> MonthlyReport
where
    Tz::Offset: std::fmt::Display,
{
    let txs = repo.load_transactions();
    let monthly = monthly_transactions(&txs, now);
    let net = total(monthly.iter().map(|t| t.amount));
    let totals = compute_category_totals(monthly.iter().copied());
    let gross = total(totals.values().copied());

    let mut categories: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, spent)| CategoryShare {
            share: if gross.is_zero() {
                Decimal::ZERO
            } else {
                percent_of(spent, gross)
            },
            category,
            spent,
        })
        .collect();
    categories.sort_by(|a, b| b.spent.cmp(&a.spent));

    MonthlyReport {
        month: now.format("%Y-%m").to_string(),
        total: net,
        categories,
    }
}
