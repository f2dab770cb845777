// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::import::{consume, ImportTrigger};
use crate::repository::Repository;
use crate::utils::format_currency;
use anyhow::{anyhow, Result};

pub fn handle(repo: &mut Repository, m: &clap::ArgMatches) -> Result<()> {
    let mut trigger = match m.subcommand() {
        Some(("url", sub)) => {
            let url = sub
                .get_one::<String>("url")
                .ok_or_else(|| anyhow!("url is required"))?;
            ImportTrigger::from_url(url)?
        }
        Some(("params", sub)) => {
            let pairs: Vec<&String> = sub
                .get_many::<String>("pairs")
                .map(|v| v.collect())
                .unwrap_or_default();
            ImportTrigger::from_assignments(&pairs)?
        }
        _ => return Ok(()),
    };
    match consume(repo, &mut trigger)? {
        Some(tx) => println!(
            "Imported: {} {} ({}) id={}",
            tx.merchant,
            format_currency(tx.amount, &tx.currency),
            tx.category,
            tx.id
        ),
        None => println!("Nothing to import: 'amount' is required"),
    }
    Ok(())
}
