// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::params;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::{currencies, decimal_at};
use crate::context::AppContext;
use crate::errors::{BackendContext, LedgerError, LedgerResult};
use crate::models::FxRate;
use crate::validate;

/// Store `1 base = rate quote` for a day, replacing any earlier value.
pub fn set_rate(
    ctx: &AppContext,
    date: NaiveDate,
    base: &str,
    quote: &str,
    rate: Decimal,
) -> LedgerResult<FxRate> {
    let user_id = ctx.user_id()?;
    let base = validate::currency_code(base)?;
    let quote = validate::currency_code(quote)?;
    if rate <= Decimal::ZERO {
        return Err(LedgerError::validation(crate::convert::RATE_NOT_POSITIVE));
    }
    ctx.conn()
        .execute(
            "INSERT INTO fx_rates(user_id, date, base, quote, rate) VALUES (?1,?2,?3,?4,?5)
             ON CONFLICT(user_id, date, base, quote) DO UPDATE SET rate=excluded.rate",
            params![user_id, date.to_string(), &base, &quote, rate.to_string()],
        )
        .op("Failed to save exchange rate.")?;
    Ok(FxRate {
        date,
        base,
        quote,
        rate,
    })
}

pub fn list_rates(ctx: &AppContext, limit: usize) -> LedgerResult<Vec<FxRate>> {
    let user_id = ctx.user_id()?;
    let limit =
        i64::try_from(limit).map_err(|_| LedgerError::validation("Limit is too large"))?;
    let mut stmt = ctx
        .conn()
        .prepare(
            "SELECT date, base, quote, rate FROM fx_rates WHERE user_id=?1
             ORDER BY date DESC, base, quote LIMIT ?2",
        )
        .op("Failed to load exchange rates.")?;
    let rows = stmt
        .query_map(params![user_id, limit], |r| {
            Ok(FxRate {
                date: r.get(0)?,
                base: r.get(1)?,
                quote: r.get(2)?,
                rate: decimal_at(r, 3)?,
            })
        })
        .op("Failed to load exchange rates.")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .op("Failed to load exchange rates.")
}

#[derive(Debug, Deserialize)]
struct Series {
    rates: HashMap<String, HashMap<String, f64>>,
    #[serde(rename = "base")]
    _base: String,
}

/// Decode a Frankfurter time-series body into rates quoted against `base`.
pub fn parse_series(base: &str, body: &str) -> LedgerResult<Vec<FxRate>> {
    let s: Series = serde_json::from_str(body)
        .map_err(|e| LedgerError::backend("Failed to read exchange rates.", e))?;
    let mut out = Vec::new();
    for (date, quotes) in s.rates {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| LedgerError::backend("Failed to read exchange rates.", e))?;
        for (quote, rate) in quotes {
            let rate = Decimal::try_from(rate)
                .map_err(|e| LedgerError::backend("Failed to read exchange rates.", e))?;
            out.push(FxRate {
                date,
                base: base.to_string(),
                quote,
                rate,
            });
        }
    }
    out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.quote.cmp(&b.quote)));
    Ok(out)
}

/// Longest history `fetch_rates` asks for, about ten years.
pub const MAX_FETCH_DAYS: i64 = 3660;

/// Pull daily ECB rates for every registered non-main currency, quoted
/// against the main currency. Existing days are left untouched.
pub fn fetch_rates(ctx: &AppContext, days: i64, today: NaiveDate) -> LedgerResult<usize> {
    let user_id = ctx.user_id()?;
    if !(1..=MAX_FETCH_DAYS).contains(&days) {
        return Err(LedgerError::validation(format!(
            "Days must be between 1 and {}",
            MAX_FETCH_DAYS
        )));
    }
    let start = chrono::TimeDelta::try_days(days)
        .and_then(|span| today.checked_sub_signed(span))
        .ok_or_else(|| LedgerError::validation("Date range is out of bounds"))?;
    let conn = ctx.conn();
    let base = currencies::require_main(conn, user_id)?;
    let targets: Vec<String> = currencies::list_currencies(ctx)?
        .into_iter()
        .filter(|c| !c.is_main)
        .map(|c| c.code)
        .collect();
    if targets.is_empty() {
        return Ok(0);
    }
    let url = format!(
        "https://api.frankfurter.dev/v1/{start}..{today}?base={base}&symbols={}",
        targets.join(",")
    );
    let client =
        crate::utils::http_client().map_err(|e| LedgerError::backend("Failed to fetch rates.", e))?;
    let body = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(|e| LedgerError::backend("Failed to fetch rates.", e))?;
    let rates = parse_series(&base, &body)?;
    let mut inserted = 0;
    for r in &rates {
        inserted += conn
            .execute(
                "INSERT OR IGNORE INTO fx_rates(user_id, date, base, quote, rate) VALUES (?1,?2,?3,?4,?5)",
                params![user_id, r.date.to_string(), &r.base, &r.quote, r.rate.to_string()],
            )
            .op("Failed to save exchange rate.")?;
    }
    info!(inserted, "exchange rates fetched");
    Ok(inserted)
}
