// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Input checks that run before anything touches the database.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::errors::{LedgerError, LedgerResult};

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d{1,2})?$").unwrap());
static RATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 6;

/// Money amount with at most two decimal places, optionally negative.
pub fn parse_amount(raw: &str) -> LedgerResult<Decimal> {
    let s = raw.trim();
    if !AMOUNT_RE.is_match(s) {
        return Err(LedgerError::validation(format!("Invalid amount '{}'", s)));
    }
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::validation(format!("Invalid amount '{}'", s)))
}

/// Empty input means "no rate supplied".
pub fn parse_rate(raw: Option<&str>) -> LedgerResult<Option<Decimal>> {
    let s = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };
    if !RATE_RE.is_match(s) {
        return Err(LedgerError::validation(format!(
            "Invalid exchange rate '{}'",
            s
        )));
    }
    s.parse::<Decimal>()
        .map(Some)
        .map_err(|_| LedgerError::validation(format!("Invalid exchange rate '{}'", s)))
}

pub fn check_amount(amount: Decimal) -> LedgerResult<Decimal> {
    if amount.normalize().scale() > 2 {
        return Err(LedgerError::validation(format!(
            "Invalid amount '{}': at most 2 decimal places",
            amount
        )));
    }
    Ok(amount)
}

/// Trim and upper-case a currency code; it must be exactly three letters.
pub fn currency_code(raw: &str) -> LedgerResult<String> {
    let code = raw.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(LedgerError::validation(format!(
            "Currency code must be 3 letters, got '{}'",
            raw.trim()
        )));
    }
    Ok(code)
}

pub fn required(raw: &str, field: &str) -> LedgerResult<String> {
    let v = raw.trim();
    if v.is_empty() {
        return Err(LedgerError::validation(format!("{} is required", field)));
    }
    Ok(v.to_string())
}

pub fn email(raw: &str) -> LedgerResult<String> {
    let e = raw.trim().to_lowercase();
    if !EMAIL_RE.is_match(&e) {
        return Err(LedgerError::validation("Invalid email address"));
    }
    Ok(e)
}

pub fn password(raw: &str) -> LedgerResult<()> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(LedgerError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
