// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::path::PathBuf;

use common::{signed_in, with_currencies};
use homeledger::cli::build_cli;
use homeledger::commands;
use homeledger::config::Config;
use homeledger::db;
use homeledger::repo::{currencies, rates};
use rust_decimal_macros::dec;

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["homeledger"];
    argv.extend_from_slice(args);
    build_cli().try_get_matches_from(argv).unwrap()
}

#[test]
fn cli_definition_is_consistent() {
    build_cli().debug_assert();
}

#[test]
fn currency_commands_drive_the_registry() {
    let mut ctx = signed_in();
    let steps: [&[&str]; 3] = [
        &["currency", "add", "--code", "usd"],
        &["currency", "add", "--code", "eur"],
        &["currency", "set-main", "--code", "eur"],
    ];
    for args in steps {
        let m = sub_matches(args);
        let (_, sub) = m.subcommand().unwrap();
        commands::currencies::handle(&mut ctx, sub).unwrap();
    }
    let main = currencies::main_currency(&ctx).unwrap().unwrap();
    assert_eq!(main.code, "EUR");

    let m = sub_matches(&["currency", "rm", "--code", "EUR"]);
    let (_, sub) = m.subcommand().unwrap();
    assert!(commands::currencies::handle(&mut ctx, sub).is_err());
}

#[test]
fn account_add_uses_defaults() {
    let ctx = with_currencies(&["USD"]);
    let m = sub_matches(&["account", "add", "--name", "Wallet", "--currency", "USD"]);
    let (_, sub) = m.subcommand().unwrap();
    commands::accounts::handle(&ctx, sub).unwrap();

    let accts = homeledger::repo::accounts::list_accounts(&ctx).unwrap();
    assert_eq!(accts.len(), 1);
    assert_eq!(accts[0].starting_balance, dec!(0));
    assert_eq!(accts[0].r#type.as_str(), "checking");
}

#[test]
fn unknown_account_type_is_refused_by_the_parser() {
    let res = build_cli().try_get_matches_from([
        "homeledger",
        "account",
        "add",
        "--name",
        "X",
        "--currency",
        "USD",
        "--type",
        "piggy_bank",
    ]);
    assert!(res.is_err());
}

#[test]
fn tx_list_filter_from_flags() {
    let m = sub_matches(&["tx", "list", "--account", "3", "--limit", "5"]);
    let (_, tx) = m.subcommand().unwrap();
    let (_, list) = tx.subcommand().unwrap();
    let f = commands::transactions::filter_from(list).unwrap();
    assert_eq!(f.account_id, Some(3));
    assert_eq!(f.category_id, None);
    assert_eq!(f.limit, Some(5));

    let m = sub_matches(&["tx", "list", "--account", "three"]);
    let (_, tx) = m.subcommand().unwrap();
    let (_, list) = tx.subcommand().unwrap();
    assert!(commands::transactions::filter_from(list).is_err());
}

#[test]
fn explicit_config_values_win() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let cfg = Config::resolve(Some(path.clone()), Some("debug".into())).unwrap();
    assert_eq!(cfg.db_path, path);
    assert_eq!(cfg.log_filter, "debug");

    let m = build_cli()
        .try_get_matches_from(["homeledger", "--db", path.to_str().unwrap(), "init"])
        .unwrap();
    let cfg = Config::from_matches(&m).unwrap();
    assert_eq!(cfg.db_path, PathBuf::from(path.to_str().unwrap()));
}

#[test]
fn file_database_keeps_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger.db");
    {
        let conn = db::open_or_init(&path).unwrap();
        common::sign_up(&homeledger::context::AppContext::new(conn, None), "ada@example.com");
    }
    let ctx = homeledger::context::AppContext::load(db::open_or_init(&path).unwrap()).unwrap();
    assert_eq!(ctx.session().unwrap().email, "ada@example.com");
}

#[test]
fn frankfurter_series_is_decoded() {
    let body = r#"{
        "amount": 1.0,
        "base": "USD",
        "start_date": "2025-01-02",
        "end_date": "2025-01-03",
        "rates": {
            "2025-01-03": {"EUR": 0.97, "GBP": 0.8},
            "2025-01-02": {"EUR": 0.96}
        }
    }"#;
    let rates = rates::parse_series("USD", body).unwrap();
    assert_eq!(rates.len(), 3);
    assert_eq!(rates[0].date.to_string(), "2025-01-02");
    assert_eq!(rates[0].quote, "EUR");
    assert_eq!(rates[0].rate.round_dp(4), dec!(0.96));
    assert_eq!(rates[2].quote, "GBP");
    assert!(rates.iter().all(|r| r.base == "USD"));

    assert!(rates::parse_series("USD", "not json").is_err());
}
