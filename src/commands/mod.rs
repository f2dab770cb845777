// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod budgets;
pub mod notifications;
pub mod currency;
pub mod reports;
pub mod importer;
pub mod doctor;

use anyhow::Result;
use std::io::Write;

use crate::cli;
use crate::repository::Repository;

/// Dispatch one CLI invocation. Budget alerts raised before and after the
/// command go to `alerts`, not stdout.
pub async fn run(
    repo: &mut Repository,
    matches: &clap::ArgMatches,
    alerts: &mut dyn Write,
) -> Result<()> {
    let check_budgets = wants_budget_check(matches);
    if check_budgets {
        announce(repo, alerts)?;
    }

    match matches.subcommand() {
        Some(("tx", sub)) => transactions::handle(repo, sub)?,
        Some(("budget", sub)) => budgets::handle(repo, sub)?,
        Some(("notify", sub)) => notifications::handle(repo, sub)?,
        Some(("currency", sub)) => currency::handle(repo, sub)?,
        Some(("import", sub)) => importer::handle(repo, sub)?,
        Some(("report", sub)) => reports::handle(repo, sub)?,
        Some(("doctor", _)) => doctor::handle(repo).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    if check_budgets {
        announce(repo, alerts)?;
    }
    Ok(())
}

/// Every command re-evaluates budgets except those that only change
/// notifications; re-raising there would undo a read or delete.
pub fn wants_budget_check(matches: &clap::ArgMatches) -> bool {
    match matches.subcommand() {
        Some(("notify", sub)) => !notifications::skips_budget_check(sub),
        Some(_) => true,
        None => false,
    }
}

fn announce(repo: &mut Repository, out: &mut dyn Write) -> Result<()> {
    for n in repo.refresh_budget_alerts() {
        writeln!(out, "🔔 [{}] {}", n.kind, n.message)?;
    }
    Ok(())
}
