// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly aggregates and budget threshold alerts.
//!
//! Everything here is a pure function of (transactions, budgets, now).
//! "This month" means the calendar month and year of `now` in `now`'s
//! timezone, not a rolling window.

use chrono::{DateTime, Datelike, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{active_budget, BudgetMap, Notification, NotificationKind, Transaction, OVERALL};
use crate::utils::{fmt2, round_half_up, timestamp_in};

/// Share of a budget at which an `info` alert fires.
const ALERT_PERCENT: i64 = 80;
/// Share at which the alert becomes a `warning`.
const EXCEEDED_PERCENT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAlert {
    pub message: String,
    pub kind: NotificationKind,
}

pub fn in_month<Tz: TimeZone>(t: &Transaction, now: &DateTime<Tz>) -> bool {
    timestamp_in(&t.timestamp, &now.timezone())
        .is_some_and(|dt| dt.year() == now.year() && dt.month() == now.month())
}

pub fn monthly_transactions<'a, Tz: TimeZone>(
    transactions: &'a [Transaction],
    now: &DateTime<Tz>,
) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| in_month(t, now)).collect()
}

/// Signed sum of this month's amounts; spending makes it negative.
pub fn compute_monthly_total<Tz: TimeZone>(transactions: &[Transaction], now: &DateTime<Tz>) -> Decimal {
    total(monthly_transactions(transactions, now).into_iter().map(|t| t.amount))
}

/// Sum that clamps at the representable range instead of overflowing.
pub fn total<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d))
}

/// Sum of absolute amounts per category.
pub fn compute_category_totals<'a, I>(transactions: I) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = BTreeMap::new();
    for t in transactions {
        let sum = totals
            .entry(t.category_or_other().to_string())
            .or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(t.amount.abs());
    }
    totals
}

/// `spent` as a percentage of `budget`. A ratio too large to represent
/// saturates at `Decimal::MAX`.
pub fn percent_of(spent: Decimal, budget: Decimal) -> Decimal {
    spent
        .checked_div(budget)
        .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
}

fn level(percent: Decimal) -> Option<NotificationKind> {
    if percent >= Decimal::from(EXCEEDED_PERCENT) {
        Some(NotificationKind::Warning)
    } else if percent >= Decimal::from(ALERT_PERCENT) {
        Some(NotificationKind::Info)
    } else {
        None
    }
}

fn whole_percent(p: Decimal) -> String {
    format!("{:.0}", round_half_up(p, 0))
}

/// Candidate alerts for this month: at most one for the overall budget, then
/// at most one per category with an active budget, in key order.
pub fn check_budget_status<Tz: TimeZone>(
    transactions: &[Transaction],
    budgets: &BudgetMap,
    now: &DateTime<Tz>,
) -> Vec<BudgetAlert> {
    let monthly = monthly_transactions(transactions, now);
    let monthly_spending = total(monthly.iter().map(|t| t.amount));
    let category_totals = compute_category_totals(monthly.iter().copied());

    let mut alerts = Vec::new();
    if let Some(overall) = active_budget(budgets, OVERALL) {
        let spent = monthly_spending.abs();
        let pct = percent_of(spent, overall);
        match level(pct) {
            Some(NotificationKind::Warning) => alerts.push(BudgetAlert {
                message: format!(
                    "Budget exceeded! You've spent ${} of ${}",
                    fmt2(spent),
                    fmt2(overall)
                ),
                kind: NotificationKind::Warning,
            }),
            Some(NotificationKind::Info) => alerts.push(BudgetAlert {
                message: format!(
                    "Budget alert: {}% used (${} / ${})",
                    whole_percent(pct),
                    fmt2(spent),
                    fmt2(overall)
                ),
                kind: NotificationKind::Info,
            }),
            None => {}
        }
    }

    for category in budgets.keys().filter(|k| k.as_str() != OVERALL) {
        let Some(budget) = active_budget(budgets, category) else {
            continue;
        };
        let spent = category_totals.get(category).copied().unwrap_or(Decimal::ZERO);
        let pct = percent_of(spent, budget);
        match level(pct) {
            Some(NotificationKind::Warning) => alerts.push(BudgetAlert {
                message: format!(
                    "{} budget exceeded! ${} / ${}",
                    category,
                    fmt2(spent),
                    fmt2(budget)
                ),
                kind: NotificationKind::Warning,
            }),
            Some(NotificationKind::Info) => alerts.push(BudgetAlert {
                message: format!("{} budget: {}% used", category, whole_percent(pct)),
                kind: NotificationKind::Info,
            }),
            None => {}
        }
    }
    alerts
}

/// True when an unread notification already carries `message`.
pub fn has_unread(notifications: &[Notification], message: &str) -> bool {
    notifications.iter().any(|n| !n.read && n.message == message)
}

/// Budget vs spending row for one overall or category budget.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgress {
    pub key: String,
    pub budget: Decimal,
    pub spent: Decimal,
    /// Capped at 100.
    pub percent: Decimal,
    pub over: bool,
}

pub fn budget_progress<Tz: TimeZone>(
    transactions: &[Transaction],
    budgets: &BudgetMap,
    now: &DateTime<Tz>,
) -> Vec<BudgetProgress> {
    let monthly = monthly_transactions(transactions, now);
    let overall_spent = total(monthly.iter().map(|t| t.amount)).abs();
    let category_totals = compute_category_totals(monthly.iter().copied());

    let row = |key: &str, budget: Decimal, spent: Decimal| BudgetProgress {
        key: key.to_string(),
        budget,
        spent,
        percent: percent_of(spent, budget).min(Decimal::ONE_HUNDRED),
        over: spent > budget,
    };

    let mut rows = Vec::new();
    if let Some(overall) = active_budget(budgets, OVERALL) {
        rows.push(row(OVERALL, overall, overall_spent));
    }
    for category in budgets.keys().filter(|k| k.as_str() != OVERALL) {
        if let Some(budget) = active_budget(budgets, category) {
            let spent = category_totals.get(category).copied().unwrap_or(Decimal::ZERO);
            rows.push(row(category, budget, spent));
        }
    }
    rows
}
