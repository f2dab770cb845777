// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::budget_progress;
use crate::models::{Category, OVERALL};
use crate::repository::Repository;
use crate::utils::{fmt2, maybe_print_json, parse_decimal, pretty_table, round_half_up};
use anyhow::{Context, Result};
use chrono::Local;
use rust_decimal::Decimal;

pub fn handle(repo: &mut Repository, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(repo, sub)?,
        Some(("clear", _)) => {
            repo.save_budgets(Default::default());
            println!("All budgets cleared");
        }
        Some(("status", sub)) => status(repo, sub)?,
        _ => {}
    }
    Ok(())
}

/// Start from the stored budgets and apply the given overrides, then save the
/// complete map.
fn set(repo: &mut Repository, sub: &clap::ArgMatches) -> Result<()> {
    let current = repo.load_budgets();
    let overall = match sub.get_one::<String>("overall") {
        Some(s) => parse_decimal(s)?,
        None => current.get(OVERALL).copied().unwrap_or(Decimal::ZERO),
    };
    let mut categories: Vec<(String, Decimal)> = current
        .iter()
        .filter(|(k, _)| k.as_str() != OVERALL)
        .map(|(k, v)| (k.clone(), *v))
        .collect();

    if let Some(items) = sub.get_many::<String>("category") {
        for item in items {
            let (name, amount) = item
                .split_once('=')
                .with_context(|| format!("Expected CATEGORY=AMOUNT, got '{}'", item))?;
            let name = name.trim().to_string();
            let amount = parse_decimal(amount)?;
            if Category::from_name(&name).is_none() {
                tracing::warn!(category = %name, "budget set for a category outside the standard list");
            }
            categories.retain(|(k, _)| *k != name);
            categories.push((name, amount));
        }
    }

    repo.set_budgets(overall, categories);
    let saved = repo.load_budgets();
    let summary: Vec<String> = saved.iter().map(|(k, v)| format!("{}={}", k, fmt2(*v))).collect();
    println!("Budgets saved: {}", summary.join(", "));
    Ok(())
}

fn status(repo: &mut Repository, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let symbol = repo.load_currency().symbol();
    let txs = repo.load_transactions();
    let budgets = repo.load_budgets();
    let progress = budget_progress(&txs, &budgets, &Local::now());

    if maybe_print_json(json_flag, jsonl_flag, &progress)? {
        return Ok(());
    }
    if progress.is_empty() {
        println!("No budgets set");
        return Ok(());
    }
    let rows = progress
        .iter()
        .map(|p| {
            let label = if p.key == OVERALL {
                "Overall Budget".to_string()
            } else {
                Category::display(&p.key)
            };
            vec![
                label,
                format!("{}{}", symbol, fmt2(p.budget)),
                format!("{}{}", symbol, fmt2(p.spent)),
                format!("{:.0}%", round_half_up(p.percent, 0)),
                format!("{}{}", symbol, fmt2(p.budget.saturating_sub(p.spent))),
                if p.over { "over".into() } else { "ok".into() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Budget", "Limit", "Spent", "Used", "Remaining", "Status"],
            rows
        )
    );
    Ok(())
}
