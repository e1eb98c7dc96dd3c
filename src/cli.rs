// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::config::{DB_ENV, LOG_ENV};
use crate::models::AccountType;

fn text(id: &'static str) -> Arg {
    Arg::new(id).long(id).num_args(1)
}

fn req(id: &'static str) -> Arg {
    text(id).required(true)
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Output as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("homeledger")
        .about("Multi-currency personal ledger with a single home currency")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .num_args(1)
                .env(DB_ENV)
                .help("Path to the SQLite database"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .num_args(1)
                .env(LOG_ENV)
                .help("tracing filter, e.g. debug or homeledger=trace"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("auth")
                .about("Sign up, sign in and out")
                .subcommand(
                    Command::new("signup")
                        .arg(req("first"))
                        .arg(req("last"))
                        .arg(req("email"))
                        .arg(req("password")),
                )
                .subcommand(
                    Command::new("login")
                        .arg(req("email"))
                        .arg(req("password")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("currency")
                .about("Currencies you track; exactly one is your main currency")
                .subcommand(Command::new("add").arg(req("code")))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("set-main").arg(req("code")))
                .subcommand(Command::new("rename").arg(req("code")).arg(req("to")))
                .subcommand(Command::new("rm").arg(req("code"))),
        )
        .subcommand(
            Command::new("account")
                .about("Bank accounts")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(req("currency"))
                        .arg(text("balance").default_value("0").allow_hyphen_values(true))
                        .arg(
                            text("type")
                                .default_value("checking")
                                .value_parser(AccountType::ALL),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(req("id"))
                        .arg(text("name"))
                        .arg(text("balance").allow_hyphen_values(true))
                        .arg(text("currency"))
                        .arg(text("type").value_parser(AccountType::ALL)),
                )
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("group")
                .about("Top-level category groups")
                .subcommand(Command::new("add").arg(req("name")))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("category")
                .about("Categories and sub-categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("name"))
                        .arg(text("parent").default_value("None")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("groups")
                                .long("groups")
                                .action(ArgAction::SetTrue)
                                .help("Only top-level groups"),
                        )
                        .arg(
                            Arg::new("subs")
                                .long("subs")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("groups")
                                .help("Only sub-categories"),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(req("id"))
                        .arg(text("name"))
                        .arg(text("parent")),
                )
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("account"))
                        .arg(req("category"))
                        .arg(req("amount").allow_hyphen_values(true))
                        .arg(req("description"))
                        .arg(text("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(text("rate").help("Account currency to main currency rate")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(text("account"))
                        .arg(text("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .num_args(1)
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(req("id"))
                        .arg(text("date"))
                        .arg(text("description"))
                        .arg(text("category"))
                        .arg(text("amount").allow_hyphen_values(true))
                        .arg(text("rate")),
                )
                .subcommand(Command::new("rm").arg(req("id"))),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move money between two accounts")
                .arg(req("from"))
                .arg(req("to"))
                .arg(req("amount"))
                .arg(req("category"))
                .arg(req("description"))
                .arg(text("date")),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange rates")
                .subcommand(
                    Command::new("set-rate")
                        .arg(req("date"))
                        .arg(req("base"))
                        .arg(req("quote"))
                        .arg(req("rate")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("limit")
                            .long("limit")
                            .num_args(1)
                            .default_value("50")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(
                    Command::new("fetch").arg(
                        Arg::new("days")
                            .long("days")
                            .num_args(1)
                            .default_value("120")
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("convert")
                        .arg(req("amount").allow_hyphen_values(true))
                        .arg(req("currency"))
                        .arg(text("rate"))
                        .arg(text("date")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries in your main currency")
                .subcommand(json_flags(
                    Command::new("summary").arg(
                        text("period")
                            .default_value("month")
                            .value_parser(["month", "week"]),
                    ),
                ))
                .subcommand(json_flags(Command::new("balances"))),
        )
        .subcommand(
            Command::new("manage")
                .about("Overview of accounts, categories and currencies")
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(Command::new("doctor").about("Check stored data for broken rules"))
}
