// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::NaiveDate;
use common::{account, category, with_currencies};
use homeledger::convert::{self, AMOUNT_TOO_LARGE, RATE_REQUIRED};
use homeledger::models::{AccountUpdate, NewTransaction, TransactionFilter, TransactionUpdate};
use homeledger::repo::{accounts, categories, transactions};
use homeledger::validate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn new_tx(account_id: i64, category_id: i64, amount: Decimal, rate: Option<Decimal>) -> NewTransaction {
    NewTransaction {
        date: day(1),
        description: "Coffee".into(),
        amount_original: amount,
        account_id,
        category_id,
        exchange_rate: rate,
    }
}

#[test]
fn conversion_rule() {
    let same = convert::convert(dec!(10.00), "USD", "USD", Some(dec!(3))).unwrap();
    assert_eq!(same.exchange_rate, Decimal::ONE);
    assert_eq!(same.amount_home, dec!(10.00));

    let foreign = convert::convert(dec!(-20.50), "EUR", "USD", Some(dec!(1.10))).unwrap();
    assert_eq!(foreign.amount_home, dec!(-22.55));

    let err = convert::convert(dec!(1), "EUR", "USD", None).unwrap_err();
    assert_eq!(err.to_string(), RATE_REQUIRED);
    assert!(convert::convert(dec!(1), "EUR", "USD", Some(dec!(0))).is_err());
    assert!(convert::convert(dec!(1), "EUR", "USD", Some(dec!(-1.2))).is_err());
}

#[test]
fn home_currency_transaction_has_unit_rate() {
    let ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "A", "USD", dec!(0));
    let c = category(&ctx, "Food", "Coffee");

    let t = transactions::create_transaction(&ctx, new_tx(a, c, dec!(10.00), None)).unwrap();
    assert_eq!(t.exchange_rate, Decimal::ONE);
    assert_eq!(t.amount_home, dec!(10.00));
    assert_eq!(t.currency_original, "USD");
}

#[test]
fn foreign_transaction_without_rate_is_rejected() {
    let ctx = with_currencies(&["USD", "EUR"]);
    let b = account(&ctx, "B", "EUR", dec!(0));
    let c = category(&ctx, "Food", "Coffee");

    let err = transactions::create_transaction(&ctx, new_tx(b, c, dec!(10.00), None)).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), RATE_REQUIRED);
    let rows = transactions::list_transactions(&ctx, &TransactionFilter::default()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn foreign_transaction_converts_with_rate() {
    let ctx = with_currencies(&["USD", "EUR"]);
    let b = account(&ctx, "B", "EUR", dec!(0));
    let c = category(&ctx, "Food", "Coffee");

    let t = transactions::create_transaction(&ctx, new_tx(b, c, dec!(10.00), Some(dec!(1.10))))
        .unwrap();
    assert_eq!(t.exchange_rate, dec!(1.10));
    assert_eq!(t.amount_home, dec!(11.00));
    assert_eq!(t.currency_original, "EUR");

    // stored values read back unchanged
    let rows = transactions::list_transactions(&ctx, &TransactionFilter::default()).unwrap();
    assert_eq!(rows[0].transaction.amount_home, dec!(11.00));
    assert_eq!(rows[0].account_currency, "EUR");
    assert_eq!(rows[0].category_name, "Coffee");
}

#[test]
fn transaction_needs_main_currency() {
    let ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "A", "USD", dec!(0));
    let c = category(&ctx, "Food", "Coffee");
    ctx.conn()
        .execute("UPDATE currencies SET is_main=0", [])
        .unwrap();
    let err = transactions::create_transaction(&ctx, new_tx(a, c, dec!(1), None)).unwrap_err();
    assert!(err.to_string().contains("No main currency set"));
}

#[test]
fn malformed_input_is_rejected_before_insert() {
    let ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "A", "USD", dec!(0));
    let c = category(&ctx, "Food", "Coffee");

    let err = transactions::create_transaction(&ctx, new_tx(a, c, dec!(1.234), None)).unwrap_err();
    assert!(err.is_validation());

    let mut blank = new_tx(a, c, dec!(1), None);
    blank.description = "   ".into();
    assert!(transactions::create_transaction(&ctx, blank).unwrap_err().is_validation());

    assert!(transactions::create_transaction(&ctx, new_tx(999, c, dec!(1), None)).is_err());
    assert!(transactions::create_transaction(&ctx, new_tx(a, 999, dec!(1), None)).is_err());
}

#[test]
fn list_is_newest_first_and_respects_filters() {
    let ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "A", "USD", dec!(0));
    let b = account(&ctx, "B", "USD", dec!(0));
    let c = category(&ctx, "Food", "Coffee");
    for (i, acct) in [(1, a), (2, b), (3, a)] {
        let mut n = new_tx(acct, c, dec!(-5), None);
        n.date = day(i);
        transactions::create_transaction(&ctx, n).unwrap();
    }

    let limited = transactions::list_transactions(
        &ctx,
        &TransactionFilter {
            limit: Some(2),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].transaction.date, day(3));

    let only_a = transactions::list_transactions(
        &ctx,
        &TransactionFilter {
            account_id: Some(a),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(only_a.len(), 2);
    assert!(only_a.iter().all(|r| r.account_name == "A"));
}

#[test]
fn update_recomputes_home_amount() {
    let ctx = with_currencies(&["USD", "EUR"]);
    let b = account(&ctx, "B", "EUR", dec!(0));
    let c = category(&ctx, "Food", "Coffee");
    let t = transactions::create_transaction(&ctx, new_tx(b, c, dec!(10), Some(dec!(1.10))))
        .unwrap();

    let u = transactions::update_transaction(
        &ctx,
        t.id,
        TransactionUpdate {
            amount_original: Some(dec!(20)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(u.amount_home, dec!(22.0));

    let u = transactions::update_transaction(
        &ctx,
        t.id,
        TransactionUpdate {
            exchange_rate: Some(dec!(1.5)),
            description: Some("Lunch".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(u.amount_home, dec!(30));
    assert_eq!(u.description, "Lunch");
}

#[test]
fn referenced_account_and_category_are_kept() {
    let ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "A", "USD", dec!(0));
    let c = category(&ctx, "Food", "Coffee");
    let t = transactions::create_transaction(&ctx, new_tx(a, c, dec!(3), None)).unwrap();

    assert!(accounts::delete_account(&ctx, a).unwrap_err().is_conflict());
    assert!(categories::delete_category(&ctx, c).unwrap_err().is_conflict());

    transactions::delete_transaction(&ctx, t.id).unwrap();
    accounts::delete_account(&ctx, a).unwrap();
    categories::delete_category(&ctx, c).unwrap();
}

#[test]
fn other_users_rows_are_invisible() {
    let mut ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "Mine", "USD", dec!(0));

    let other = common::sign_up(&ctx, "bob@example.com");
    ctx.set_session(Some(other));
    assert!(accounts::list_accounts(&ctx).unwrap().is_empty());
    assert!(accounts::get_account(&ctx, a).is_err());
    assert!(accounts::delete_account(&ctx, a).is_err());
}

#[test]
fn oversized_home_amount_is_rejected() {
    let ctx = with_currencies(&["USD", "EUR"]);
    let b = account(&ctx, "B", "EUR", dec!(0));
    let c = category(&ctx, "Food", "Coffee");
    let amount = validate::parse_amount("99999999999999999999.99").unwrap();
    let rate = validate::parse_rate(Some("1000000000")).unwrap();

    let err = transactions::create_transaction(&ctx, new_tx(b, c, amount, rate)).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), AMOUNT_TOO_LARGE);
    assert!(transactions::list_transactions(&ctx, &TransactionFilter::default())
        .unwrap()
        .is_empty());

    let t = transactions::create_transaction(&ctx, new_tx(b, c, dec!(1), Some(dec!(1.10))))
        .unwrap();
    let err = transactions::update_transaction(
        &ctx,
        t.id,
        TransactionUpdate {
            amount_original: Some(amount),
            exchange_rate: rate,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), AMOUNT_TOO_LARGE);
}

#[test]
fn limit_beyond_sql_range_is_rejected() {
    let ctx = with_currencies(&["USD"]);
    let err = transactions::list_transactions(
        &ctx,
        &TransactionFilter {
            limit: Some(usize::MAX),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn account_currency_is_fixed_once_used() {
    let ctx = with_currencies(&["USD", "EUR"]);
    let e = account(&ctx, "Euro", "EUR", dec!(0));
    let spare = account(&ctx, "Spare", "EUR", dec!(0));
    let c = category(&ctx, "Food", "Coffee");
    transactions::create_transaction(&ctx, new_tx(e, c, dec!(10.00), Some(dec!(1.10)))).unwrap();

    let to_usd = || AccountUpdate {
        currency: Some("USD".into()),
        ..Default::default()
    };
    let err = accounts::update_account(&ctx, e, to_usd()).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(accounts::get_account(&ctx, e).unwrap().currency, "EUR");

    // restating the same currency is fine
    let same = accounts::update_account(
        &ctx,
        e,
        AccountUpdate {
            name: Some("Euro wallet".into()),
            currency: Some("eur".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(same.currency, "EUR");

    let moved = accounts::update_account(&ctx, spare, to_usd()).unwrap();
    assert_eq!(moved.currency, "USD");
}
