// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::NaiveDate;
use common::with_currencies;
use homeledger::repo::rates::{self, MAX_FETCH_DAYS};
use rust_decimal_macros::dec;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn fetch_span_is_checked_before_any_request() {
    let ctx = with_currencies(&["USD", "EUR"]);
    let today = ymd(2025, 1, 1);
    for days in [0, -5, MAX_FETCH_DAYS + 1, 1_000_000_000, i64::MAX, i64::MIN] {
        let err = rates::fetch_rates(&ctx, days, today).unwrap_err();
        assert!(err.is_validation(), "days={days}: {err}");
    }
}

#[test]
fn rates_upsert_and_list_newest_first() {
    let ctx = with_currencies(&["USD", "EUR"]);
    rates::set_rate(&ctx, ymd(2025, 1, 2), "usd", "eur", dec!(0.96)).unwrap();
    rates::set_rate(&ctx, ymd(2025, 1, 3), "USD", "EUR", dec!(0.97)).unwrap();
    rates::set_rate(&ctx, ymd(2025, 1, 3), "USD", "EUR", dec!(0.98)).unwrap();

    let list = rates::list_rates(&ctx, 10).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].date, ymd(2025, 1, 3));
    assert_eq!(list[0].rate, dec!(0.98));
    assert_eq!(list[1].base, "USD");

    assert!(rates::list_rates(&ctx, usize::MAX).unwrap_err().is_validation());
    assert!(rates::set_rate(&ctx, ymd(2025, 1, 4), "USD", "EUR", dec!(0))
        .unwrap_err()
        .is_validation());
}
