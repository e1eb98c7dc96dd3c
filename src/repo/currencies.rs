// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::context::AppContext;
use crate::errors::{BackendContext, LedgerError, LedgerResult};
use crate::models::Currency;
use crate::validate;

pub const CANNOT_DELETE_MAIN: &str =
    "Cannot delete your main currency. Please set another currency as main first.";

fn row_to_currency(r: &rusqlite::Row<'_>) -> rusqlite::Result<Currency> {
    Ok(Currency {
        id: r.get(0)?,
        code: r.get(1)?,
        is_main: r.get(2)?,
    })
}

/// Register a currency. The owner's first currency becomes the main one so
/// the registry never exists without a main currency.
pub fn create_currency(ctx: &AppContext, code: &str) -> LedgerResult<Currency> {
    let user_id = ctx.user_id()?;
    let code = validate::currency_code(code)?;
    let conn = ctx.conn();
    if find(conn, user_id, &code)?.is_some() {
        return Err(LedgerError::Conflict(format!(
            "Currency {} already exists",
            code
        )));
    }
    let has_main: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM currencies WHERE user_id=?1 AND is_main=1)",
            params![user_id],
            |r| r.get(0),
        )
        .op("Failed to create currency.")?;
    conn.execute(
        "INSERT INTO currencies(user_id, code, is_main) VALUES (?1, ?2, ?3)",
        params![user_id, &code, !has_main],
    )
    .op("Failed to create currency.")?;
    debug!(user_id, code = %code, is_main = !has_main, "currency created");
    Ok(Currency {
        id: conn.last_insert_rowid(),
        code,
        is_main: !has_main,
    })
}

/// Main currency first, then alphabetical.
pub fn list_currencies(ctx: &AppContext) -> LedgerResult<Vec<Currency>> {
    let user_id = ctx.user_id()?;
    let mut stmt = ctx
        .conn()
        .prepare(
            "SELECT id, code, is_main FROM currencies WHERE user_id=?1
             ORDER BY is_main DESC, code ASC",
        )
        .op("Failed to load currencies.")?;
    let rows = stmt
        .query_map(params![user_id], row_to_currency)
        .op("Failed to load currencies.")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .op("Failed to load currencies.")
}

pub fn main_currency(ctx: &AppContext) -> LedgerResult<Option<Currency>> {
    let user_id = ctx.user_id()?;
    main_for(ctx.conn(), user_id)
}

pub(crate) fn main_for(conn: &Connection, user_id: i64) -> LedgerResult<Option<Currency>> {
    conn.query_row(
        "SELECT id, code, is_main FROM currencies WHERE user_id=?1 AND is_main=1",
        params![user_id],
        row_to_currency,
    )
    .optional()
    .op("Failed to load main currency.")
}

/// Main currency code or the error shown when none is configured.
pub(crate) fn require_main(conn: &Connection, user_id: i64) -> LedgerResult<String> {
    main_for(conn, user_id)?.map(|c| c.code).ok_or_else(|| {
        LedgerError::validation("No main currency set. Please set a main currency first.")
    })
}

pub(crate) fn find(conn: &Connection, user_id: i64, code: &str) -> LedgerResult<Option<Currency>> {
    conn.query_row(
        "SELECT id, code, is_main FROM currencies WHERE user_id=?1 AND code=?2",
        params![user_id, code],
        row_to_currency,
    )
    .optional()
    .op("Failed to load currency.")
}

/// Move the main flag to `code`. Clearing the old flag and setting the new
/// one commit together; an unknown code leaves the registry untouched.
pub fn set_main_currency(ctx: &mut AppContext, code: &str) -> LedgerResult<()> {
    let user_id = ctx.user_id()?;
    let code = validate::currency_code(code)?;
    let tx = ctx
        .conn_mut()
        .transaction()
        .op("Failed to set new main currency.")?;
    tx.execute(
        "UPDATE currencies SET is_main=0 WHERE user_id=?1 AND is_main=1 AND code<>?2",
        params![user_id, &code],
    )
    .op("Failed to reset main currency.")?;
    let n = tx
        .execute(
            "UPDATE currencies SET is_main=1 WHERE user_id=?1 AND code=?2",
            params![user_id, &code],
        )
        .op("Failed to set new main currency.")?;
    if n == 0 {
        // dropping the transaction rolls back the reset
        return Err(LedgerError::not_found("Currency", code));
    }
    tx.commit().op("Failed to set new main currency.")?;
    debug!(user_id, code = %code, "main currency set");
    Ok(())
}

/// Rename a currency code. Accounts follow through the foreign key;
/// transactions and stored rates are rewritten in the same transaction.
pub fn update_currency(ctx: &AppContext, code: &str, new_code: &str) -> LedgerResult<Currency> {
    let user_id = ctx.user_id()?;
    let code = validate::currency_code(code)?;
    let new_code = validate::currency_code(new_code)?;
    let conn = ctx.conn();
    let current = find(conn, user_id, &code)?.ok_or_else(|| LedgerError::not_found("Currency", &code))?;
    if new_code == code {
        return Ok(current);
    }
    if find(conn, user_id, &new_code)?.is_some() {
        return Err(LedgerError::Conflict(format!(
            "Currency {} already exists",
            new_code
        )));
    }
    let tx = conn
        .unchecked_transaction()
        .op("Failed to update currency.")?;
    for sql in [
        "UPDATE currencies SET code=?3 WHERE user_id=?1 AND code=?2",
        "UPDATE transactions SET currency_original=?3 WHERE user_id=?1 AND currency_original=?2",
        "UPDATE fx_rates SET base=?3 WHERE user_id=?1 AND base=?2",
        "UPDATE fx_rates SET quote=?3 WHERE user_id=?1 AND quote=?2",
    ] {
        tx.execute(sql, params![user_id, &code, &new_code])
            .op("Failed to update currency.")?;
    }
    tx.commit().op("Failed to update currency.")?;
    Ok(Currency {
        code: new_code,
        ..current
    })
}

pub fn delete_currency(ctx: &AppContext, code: &str) -> LedgerResult<()> {
    let user_id = ctx.user_id()?;
    let code = validate::currency_code(code)?;
    let conn = ctx.conn();
    let current = find(conn, user_id, &code)?.ok_or_else(|| LedgerError::not_found("Currency", &code))?;
    if current.is_main {
        return Err(LedgerError::Conflict(CANNOT_DELETE_MAIN.into()));
    }
    let in_use: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM accounts WHERE user_id=?1 AND currency=?2",
            params![user_id, &code],
            |r| r.get(0),
        )
        .op("Failed to delete currency.")?;
    if in_use > 0 {
        return Err(LedgerError::Conflict(format!(
            "Currency {} is used by {} account(s)",
            code, in_use
        )));
    }
    conn.execute(
        "DELETE FROM currencies WHERE user_id=?1 AND code=?2",
        params![user_id, &code],
    )
    .op("Failed to delete currency.")?;
    Ok(())
}
