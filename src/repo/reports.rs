// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::params;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{accounts, currencies, decimal_at};
use crate::context::AppContext;
use crate::convert::{AMOUNT_TOO_LARGE, checked_product, checked_sum, implied_rate};
use crate::errors::{BackendContext, LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month,
    Week,
}

impl Period {
    pub fn parse(s: &str) -> LedgerResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(Period::Month),
            "week" => Ok(Period::Week),
            other => Err(LedgerError::validation(format!(
                "Unknown period '{}' (use month|week)",
                other
            ))),
        }
    }

    /// Inclusive date range containing `today`; weeks start on Monday.
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Period::Month => {
                let start = today.with_day(1).unwrap_or(today);
                let next = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
                };
                let end = next.map(|n| n - Duration::days(1)).unwrap_or(today);
                (start, end)
            }
            Period::Week => {
                let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (start, start + Duration::days(6))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub currency: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub count: usize,
}

/// Income and expense in home currency for the period containing `today`.
/// Transfer legs are excluded; they move money without earning or spending it.
pub fn transaction_summary(ctx: &AppContext, period: Period, today: NaiveDate) -> LedgerResult<Summary> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let currency = currencies::require_main(conn, user_id)?;
    let (from, to) = period.range(today);
    let mut stmt = conn
        .prepare(
            "SELECT amount_home FROM transactions
             WHERE user_id=?1 AND transfer_id IS NULL AND date>=?2 AND date<=?3",
        )
        .op("Failed to compute summary.")?;
    let amounts = stmt
        .query_map(params![user_id, from.to_string(), to.to_string()], |r| {
            decimal_at(r, 0)
        })
        .op("Failed to compute summary.")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .op("Failed to compute summary.")?;

    let income = checked_sum(amounts.iter().copied().filter(|a| *a > Decimal::ZERO))?;
    let expense = checked_sum(amounts.iter().filter(|a| **a <= Decimal::ZERO).map(|a| -*a))?;
    let net = income
        .checked_sub(expense)
        .ok_or_else(|| LedgerError::validation(AMOUNT_TOO_LARGE))?;
    Ok(Summary {
        from,
        to,
        currency,
        income,
        expense,
        net,
        count: amounts.len(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct Balance {
    pub account_id: i64,
    pub account: String,
    pub currency: String,
    pub balance: Decimal,
    /// `None` when the starting balance needs a rate that is not stored.
    pub balance_home: Option<Decimal>,
}

/// Starting balance plus all transactions, per account, in the account
/// currency and in home currency.
pub fn account_balances(ctx: &AppContext, today: NaiveDate) -> LedgerResult<Vec<Balance>> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let main = currencies::require_main(conn, user_id)?;
    let mut out = Vec::new();
    for acct in accounts::list_accounts(ctx)? {
        let mut stmt = conn
            .prepare_cached(
                "SELECT amount_original, amount_home FROM transactions WHERE user_id=?1 AND account_id=?2",
            )
            .op("Failed to compute balances.")?;
        let legs = stmt
            .query_map(params![user_id, acct.id], |r| {
                Ok((decimal_at(r, 0)?, decimal_at(r, 1)?))
            })
            .op("Failed to compute balances.")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .op("Failed to compute balances.")?;
        let balance = checked_sum(
            std::iter::once(acct.starting_balance).chain(legs.iter().map(|(o, _)| *o)),
        )?;
        let balance_home = match implied_rate(conn, user_id, today, &acct.currency, &main)? {
            Some(r) => {
                let start = checked_product(acct.starting_balance, r)?;
                Some(checked_sum(
                    std::iter::once(start).chain(legs.iter().map(|(_, h)| *h)),
                )?)
            }
            None => None,
        };
        out.push(Balance {
            account_id: acct.id,
            account: acct.name,
            currency: acct.currency,
            balance,
            balance_home,
        });
    }
    Ok(out)
}
