// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::NaiveDate;
use common::{account, category, with_currencies};
use homeledger::context::AppContext;
use homeledger::convert::AMOUNT_TOO_LARGE;
use homeledger::errors::LedgerError;
use homeledger::models::{CreateTransfer, TransactionFilter, TransactionUpdate};
use homeledger::repo::{rates, transactions, transfers};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
}

fn req(from: i64, to: i64, cat: i64, amount: Decimal) -> CreateTransfer {
    CreateTransfer {
        date: day(5),
        description: "Move savings".into(),
        amount,
        from_account_id: from,
        to_account_id: to,
        category_id: cat,
    }
}

fn count(ctx: &AppContext, table: &str) -> i64 {
    ctx.conn()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn same_currency_transfer_writes_two_linked_legs() {
    let mut ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "Checking", "USD", dec!(500));
    let b = account(&ctx, "Savings", "USD", dec!(0));
    let c = category(&ctx, "Internal", "Transfer");

    let t = transfers::create_transfer(&mut ctx, req(a, b, c, dec!(120.50))).unwrap();
    assert_eq!(t.debit.amount_original, dec!(-120.50));
    assert_eq!(t.credit.amount_original, dec!(120.50));
    assert_eq!(t.debit.amount_home, dec!(-120.50));
    assert_eq!(t.credit.amount_home, dec!(120.50));
    assert_eq!(t.debit.transfer_id, Some(t.id));
    assert_eq!(t.credit.transfer_id, Some(t.id));

    let stored = transfers::get_transfer(&ctx, t.id).unwrap();
    assert_eq!(stored.debit.id, t.debit.id);
    assert_eq!(stored.credit.id, t.credit.id);
    assert_eq!(stored.debit.account_id, a);
    assert_eq!(stored.credit.account_id, b);
}

#[test]
fn cross_currency_transfer_uses_stored_rates() {
    let mut ctx = with_currencies(&["USD", "EUR"]);
    let a = account(&ctx, "Checking", "USD", dec!(0));
    let b = account(&ctx, "Euro", "EUR", dec!(0));
    let c = category(&ctx, "Internal", "Transfer");
    rates::set_rate(&ctx, day(1), "USD", "EUR", dec!(0.80)).unwrap();

    let t = transfers::create_transfer(&mut ctx, req(a, b, c, dec!(100))).unwrap();
    assert_eq!(t.debit.currency_original, "USD");
    assert_eq!(t.debit.exchange_rate, Decimal::ONE);
    assert_eq!(t.debit.amount_home, dec!(-100));

    assert_eq!(t.credit.currency_original, "EUR");
    assert_eq!(t.credit.amount_original, dec!(80));
    // EUR -> USD comes from the reciprocal of the stored pair
    assert_eq!(t.credit.exchange_rate, dec!(1.25));
    assert_eq!(t.credit.amount_home, dec!(100));
}

#[test]
fn missing_rate_writes_nothing() {
    let mut ctx = with_currencies(&["USD", "GBP"]);
    let a = account(&ctx, "Checking", "USD", dec!(0));
    let b = account(&ctx, "London", "GBP", dec!(0));
    let c = category(&ctx, "Internal", "Transfer");
    // dated after the transfer, so it cannot be used
    rates::set_rate(&ctx, day(10), "USD", "GBP", dec!(0.75)).unwrap();

    let err = transfers::create_transfer(&mut ctx, req(a, b, c, dec!(10))).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(count(&ctx, "transfers"), 0);
    assert_eq!(count(&ctx, "transactions"), 0);
}

#[test]
fn invalid_requests_are_rejected() {
    let mut ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "Checking", "USD", dec!(0));
    let b = account(&ctx, "Savings", "USD", dec!(0));
    let c = category(&ctx, "Internal", "Transfer");

    for bad in [
        req(a, a, c, dec!(10)),
        req(a, b, c, dec!(0)),
        req(a, b, c, dec!(-5)),
        req(a, b, c, dec!(1.001)),
    ] {
        let err = transfers::create_transfer(&mut ctx, bad).unwrap_err();
        assert!(err.is_validation(), "{err}");
    }
    let err = transfers::create_transfer(&mut ctx, req(a, 999, c, dec!(1))).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
    assert_eq!(count(&ctx, "transactions"), 0);
}

#[test]
fn deleting_one_leg_removes_the_whole_transfer() {
    let mut ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "Checking", "USD", dec!(0));
    let b = account(&ctx, "Savings", "USD", dec!(0));
    let c = category(&ctx, "Internal", "Transfer");
    let t = transfers::create_transfer(&mut ctx, req(a, b, c, dec!(40))).unwrap();

    transactions::delete_transaction(&ctx, t.credit.id).unwrap();
    assert_eq!(count(&ctx, "transfers"), 0);
    let rows = transactions::list_transactions(&ctx, &TransactionFilter::default()).unwrap();
    assert!(rows.is_empty());
    assert!(matches!(
        transfers::get_transfer(&ctx, t.id).unwrap_err(),
        LedgerError::NotFound { .. }
    ));
}

#[test]
fn legs_keep_their_amounts() {
    let mut ctx = with_currencies(&["USD"]);
    let a = account(&ctx, "Checking", "USD", dec!(0));
    let b = account(&ctx, "Savings", "USD", dec!(0));
    let c = category(&ctx, "Internal", "Transfer");
    let t = transfers::create_transfer(&mut ctx, req(a, b, c, dec!(40))).unwrap();

    let err = transactions::update_transaction(
        &ctx,
        t.debit.id,
        TransactionUpdate {
            amount_original: Some(dec!(-50)),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(err.is_conflict());

    let renamed = transactions::update_transaction(
        &ctx,
        t.debit.id,
        TransactionUpdate {
            description: Some("Rainy day fund".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(renamed.description, "Rainy day fund");
    assert_eq!(renamed.amount_original, dec!(-40));
}

#[test]
fn oversized_transfer_writes_nothing() {
    let mut ctx = with_currencies(&["USD", "EUR"]);
    let a = account(&ctx, "Checking", "USD", dec!(0));
    let b = account(&ctx, "Euro", "EUR", dec!(0));
    let c = category(&ctx, "Internal", "Transfer");
    rates::set_rate(&ctx, day(1), "USD", "EUR", dec!(1000000000)).unwrap();

    let err = transfers::create_transfer(
        &mut ctx,
        req(a, b, c, dec!(99999999999999999999.99)),
    )
    .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), AMOUNT_TOO_LARGE);
    assert_eq!(count(&ctx, "transfers"), 0);
    assert_eq!(count(&ctx, "transactions"), 0);
}
