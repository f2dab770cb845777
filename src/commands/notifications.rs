// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Notification;
use crate::repository::Repository;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{anyhow, Result};

pub fn handle(repo: &mut Repository, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(repo, sub)?,
        Some(("read", sub)) => {
            let id = required_id(sub)?;
            if !repo.mark_notification_read(id) {
                return Err(anyhow!("No unread notification '{}'", id));
            }
            println!("Marked {} as read", id);
        }
        Some(("read-all", _)) => {
            repo.mark_all_notifications_read();
            println!("All notifications marked as read");
        }
        Some(("delete", sub)) => {
            let id = required_id(sub)?;
            if !repo.delete_notification(id) {
                return Err(anyhow!("Notification '{}' not found", id));
            }
            println!("Deleted notification {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Subcommands that change notifications must not re-raise budget alerts.
pub fn skips_budget_check(m: &clap::ArgMatches) -> bool {
    matches!(m.subcommand_name(), Some("read" | "read-all" | "delete"))
}

fn required_id(sub: &clap::ArgMatches) -> Result<&String> {
    sub.get_one::<String>("id")
        .ok_or_else(|| anyhow!("id is required"))
}

fn list(repo: &mut Repository, sub: &clap::ArgMatches) -> Result<()> {
    let unread_only = sub.get_flag("unread");
    let all = repo.load_notifications();
    let data: Vec<&Notification> = all.iter().filter(|n| !unread_only || !n.read).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No notifications");
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|n| {
            vec![
                if n.read { " ".into() } else { "●".into() },
                n.kind.to_string(),
                n.message.clone(),
                n.timestamp.clone(),
                n.id.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["", "Type", "Message", "When", "Id"], rows));
    println!("{} unread", repo.unread_count());
    Ok(())
}
