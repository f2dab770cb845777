// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Currency;
use crate::repository::Repository;
use crate::utils::pretty_table;
use anyhow::{anyhow, Result};

pub fn handle(repo: &mut Repository, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let code = sub
                .get_one::<String>("code")
                .ok_or_else(|| anyhow!("code is required"))?;
            let currency = code.trim().to_uppercase().parse::<Currency>().map_err(|e| anyhow!(e))?;
            repo.save_currency(currency);
            println!("Display currency set to {} ({})", currency, currency.name());
        }
        Some(("list", _)) => {
            let active = repo.load_currency();
            let rows = Currency::ALL
                .iter()
                .map(|c| {
                    vec![
                        if *c == active { "*".into() } else { String::new() },
                        c.code().to_string(),
                        c.symbol().to_string(),
                        c.name().to_string(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["", "Code", "Symbol", "Name"], rows));
        }
        _ => {
            let c = repo.load_currency();
            println!("{} ({} {})", c, c.symbol(), c.name());
        }
    }
    Ok(())
}
