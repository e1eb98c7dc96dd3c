// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::errors::{BackendContext, LedgerError, LedgerResult};

pub const RATE_REQUIRED: &str = "Exchange rate is required for different currencies.";
pub const RATE_NOT_POSITIVE: &str = "Exchange rate must be positive.";
pub const AMOUNT_TOO_LARGE: &str = "Amount is too large";

/// `amount * rate`, or a validation error when the product does not fit a `Decimal`.
pub fn checked_product(amount: Decimal, rate: Decimal) -> LedgerResult<Decimal> {
    amount
        .checked_mul(rate)
        .ok_or_else(|| LedgerError::validation(AMOUNT_TOO_LARGE))
}

/// Overflow-checked sum of money values.
pub fn checked_sum<I>(values: I) -> LedgerResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| LedgerError::validation(AMOUNT_TOO_LARGE))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub exchange_rate: Decimal,
    pub amount_home: Decimal,
}

/// Home-currency value of an amount recorded in `currency`.
///
/// Same currency: the rate is pinned to 1 and any supplied rate is ignored.
/// Different currency: a positive rate must be supplied and the home amount
/// is the exact product, without rounding.
pub fn convert(
    amount_original: Decimal,
    currency: &str,
    main_currency: &str,
    exchange_rate: Option<Decimal>,
) -> LedgerResult<Conversion> {
    if currency.eq_ignore_ascii_case(main_currency) {
        return Ok(Conversion {
            exchange_rate: Decimal::ONE,
            amount_home: amount_original,
        });
    }
    let rate = exchange_rate.ok_or_else(|| LedgerError::validation(RATE_REQUIRED))?;
    if rate <= Decimal::ZERO {
        return Err(LedgerError::validation(RATE_NOT_POSITIVE));
    }
    Ok(Conversion {
        exchange_rate: rate,
        amount_home: checked_product(amount_original, rate)?,
    })
}

/// Rate for `from -> to` on or before `date` from the owner's stored rates.
/// Tries the direct pair first, then the reciprocal of `to -> from`.
pub fn implied_rate(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
    from: &str,
    to: &str,
) -> LedgerResult<Option<Decimal>> {
    if from == to {
        return Ok(Some(Decimal::ONE));
    }
    if let Some(r) = find_rate(conn, user_id, date, from, to)? {
        return Ok(Some(r));
    }
    if let Some(r) = find_rate(conn, user_id, date, to, from)? {
        let inverse = Decimal::ONE
            .checked_div(r)
            .ok_or_else(|| LedgerError::validation(AMOUNT_TOO_LARGE))?;
        return Ok(Some(inverse));
    }
    Ok(None)
}

fn find_rate(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
    base: &str,
    quote: &str,
) -> LedgerResult<Option<Decimal>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT rate FROM fx_rates WHERE user_id=?1 AND base=?2 AND quote=?3 AND date<=?4
             ORDER BY date DESC LIMIT 1",
        )
        .op("Failed to look up exchange rate.")?;
    let r: Option<String> = stmt
        .query_row(params![user_id, base, quote, date.to_string()], |r| r.get(0))
        .optional()
        .op("Failed to look up exchange rate.")?;
    match r {
        Some(s) => {
            let d = s.parse::<Decimal>().map_err(|_| {
                LedgerError::backend(
                    "Failed to look up exchange rate.",
                    format!("Invalid rate '{}' for {}/{}", s, base, quote),
                )
            })?;
            // zero rows are unusable, treat as missing
            Ok(if d.is_zero() { None } else { Some(d) })
        }
        None => Ok(None),
    }
}
