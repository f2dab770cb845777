// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("finboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Local-only personal finance dashboard: transactions, budgets and alerts")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .env("FINBOARD_DATA_DIR")
                .global(true)
                .help("Directory holding the primary store and the replica"),
        )
        .arg(
            Arg::new("no-replica")
                .long("no-replica")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Run with the primary store only"),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, list and delete transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("merchant").long("merchant").default_value(""))
                        .arg(Arg::new("category").long("category").help("Defaults to Other"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("timestamp").long("timestamp")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .action(ArgAction::SetTrue)
                                .help("Only this calendar month"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(Command::new("delete").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budgets")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("overall").long("overall"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .action(ArgAction::Append)
                                .help("CATEGORY=AMOUNT; an amount of 0 removes the budget"),
                        ),
                )
                .subcommand(Command::new("clear"))
                .subcommand(json_flags(Command::new("status"))),
        )
        .subcommand(
            Command::new("notify")
                .about("Notification center")
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("unread")
                            .long("unread")
                            .action(ArgAction::SetTrue),
                    ),
                ))
                .subcommand(Command::new("read").arg(Arg::new("id").required(true)))
                .subcommand(Command::new("read-all"))
                .subcommand(Command::new("delete").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("currency")
                .about("Display currency preference")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("set").arg(Arg::new("code").required(true)))
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("import")
                .about("One-shot transaction import")
                .subcommand(Command::new("url").arg(Arg::new("url").required(true)))
                .subcommand(
                    Command::new("params").arg(
                        Arg::new("pairs")
                            .required(true)
                            .num_args(1..)
                            .allow_hyphen_values(true)
                            .help("key=value pairs: amount, merchant|name, category, currency, timestamp"),
                    ),
                ),
        )
        .subcommand(json_flags(
            Command::new("report").about("This month's total and spending by category"),
        ))
        .subcommand(Command::new("doctor").about("Check primary and replica consistency"))
}
