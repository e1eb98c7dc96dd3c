// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped data access. Every function takes the [`AppContext`]
//! explicitly and returns [`LedgerResult`]; nothing here retries.
//!
//! [`AppContext`]: crate::context::AppContext
//! [`LedgerResult`]: crate::errors::LedgerResult

pub mod accounts;
pub mod categories;
pub mod currencies;
pub mod doctor;
pub mod management;
pub mod rates;
pub mod reports;
pub mod transactions;
pub mod transfers;

use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;

/// Decimals are stored as TEXT; surface a bad value as a column conversion error.
pub(crate) fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
