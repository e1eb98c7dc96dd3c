// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::currencies;
use super::decimal_at;
use crate::context::AppContext;
use crate::errors::{BackendContext, LedgerError, LedgerResult};
use crate::models::{Account, AccountType, AccountUpdate, NewAccount};
use crate::validate;

const SELECT: &str = "SELECT id, name, type, currency, starting_balance FROM accounts";

fn row_to_account(r: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let typ: String = r.get(2)?;
    Ok(Account {
        id: r.get(0)?,
        name: r.get(1)?,
        // unknown stored types degrade to "other" rather than failing the listing
        r#type: typ.parse().unwrap_or(AccountType::Other),
        currency: r.get(3)?,
        starting_balance: decimal_at(r, 4)?,
    })
}

fn require_currency(conn: &Connection, user_id: i64, raw: &str) -> LedgerResult<String> {
    let code = validate::currency_code(raw)?;
    if currencies::find(conn, user_id, &code)?.is_none() {
        return Err(LedgerError::validation(format!(
            "Currency {} is not in your currency list",
            code
        )));
    }
    Ok(code)
}

pub fn create_account(ctx: &AppContext, new: NewAccount) -> LedgerResult<Account> {
    let user_id = ctx.user_id()?;
    let name = validate::required(&new.name, "Name")?;
    let balance = validate::check_amount(new.starting_balance)?;
    let conn = ctx.conn();
    let currency = require_currency(conn, user_id, &new.currency)?;
    conn.execute(
        "INSERT INTO accounts(user_id, name, type, currency, starting_balance)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            &name,
            new.r#type.as_str(),
            &currency,
            balance.to_string()
        ],
    )
    .op("Failed to create account.")?;
    let id = conn.last_insert_rowid();
    debug!(user_id, id, "account created");
    Ok(Account {
        id,
        name,
        r#type: new.r#type,
        currency,
        starting_balance: balance,
    })
}

pub fn list_accounts(ctx: &AppContext) -> LedgerResult<Vec<Account>> {
    let user_id = ctx.user_id()?;
    let mut stmt = ctx
        .conn()
        .prepare(&format!("{SELECT} WHERE user_id=?1 ORDER BY name"))
        .op("Failed to load bank accounts.")?;
    let rows = stmt
        .query_map(params![user_id], row_to_account)
        .op("Failed to load bank accounts.")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .op("Failed to load bank accounts.")
}

pub fn get_account(ctx: &AppContext, id: i64) -> LedgerResult<Account> {
    let user_id = ctx.user_id()?;
    find(ctx.conn(), user_id, id)?.ok_or_else(|| LedgerError::not_found("Account", id))
}

pub(crate) fn find(conn: &Connection, user_id: i64, id: i64) -> LedgerResult<Option<Account>> {
    conn.query_row(
        &format!("{SELECT} WHERE user_id=?1 AND id=?2"),
        params![user_id, id],
        row_to_account,
    )
    .optional()
    .op("Failed to load account.")
}

fn transaction_count(conn: &Connection, user_id: i64, account_id: i64) -> LedgerResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND account_id=?2",
        params![user_id, account_id],
        |r| r.get(0),
    )
    .op("Failed to count account transactions.")
}

/// Apply only the fields that are set. The currency is fixed once
/// transactions reference the account.
pub fn update_account(ctx: &AppContext, id: i64, upd: AccountUpdate) -> LedgerResult<Account> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let mut acct = find(conn, user_id, id)?.ok_or_else(|| LedgerError::not_found("Account", id))?;
    if let Some(name) = upd.name {
        acct.name = validate::required(&name, "Name")?;
    }
    if let Some(t) = upd.r#type {
        acct.r#type = t;
    }
    if let Some(b) = upd.starting_balance {
        acct.starting_balance = validate::check_amount(b)?;
    }
    if let Some(c) = upd.currency {
        let code = require_currency(conn, user_id, &c)?;
        // recorded amounts stay in the currency they were entered in
        if code != acct.currency {
            let refs = transaction_count(conn, user_id, id)?;
            if refs > 0 {
                return Err(LedgerError::Conflict(format!(
                    "Account currency cannot change while {} transaction(s) reference it",
                    refs
                )));
            }
        }
        acct.currency = code;
    }
    conn.execute(
        "UPDATE accounts SET name=?3, type=?4, currency=?5, starting_balance=?6
         WHERE user_id=?1 AND id=?2",
        params![
            user_id,
            id,
            &acct.name,
            acct.r#type.as_str(),
            &acct.currency,
            acct.starting_balance.to_string()
        ],
    )
    .op("Failed to update account.")?;
    Ok(acct)
}

/// Accounts still referenced by transactions are kept.
pub fn delete_account(ctx: &AppContext, id: i64) -> LedgerResult<()> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    if find(conn, user_id, id)?.is_none() {
        return Err(LedgerError::not_found("Account", id));
    }
    let refs = transaction_count(conn, user_id, id)?;
    if refs > 0 {
        return Err(LedgerError::Conflict(format!(
            "Account is referenced by {} transaction(s)",
            refs
        )));
    }
    conn.execute(
        "DELETE FROM accounts WHERE user_id=?1 AND id=?2",
        params![user_id, id],
    )
    .op("Failed to delete account.")?;
    Ok(())
}
