// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use super::{accounts, categories, currencies, decimal_at};
use crate::context::AppContext;
use crate::convert::convert;
use crate::errors::{BackendContext, LedgerError, LedgerResult};
use crate::models::{
    NewTransaction, Transaction, TransactionFilter, TransactionRow, TransactionUpdate,
};
use crate::validate;

pub const DEFAULT_LIST_LIMIT: usize = 100;

const COLUMNS: &str = "t.id, t.date, t.description, t.amount_original, t.currency_original, \
     t.exchange_rate, t.amount_home, t.account_id, t.category_id, t.transfer_id";

pub(crate) fn row_to_transaction(r: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        date: r.get(1)?,
        description: r.get(2)?,
        amount_original: decimal_at(r, 3)?,
        currency_original: r.get(4)?,
        exchange_rate: decimal_at(r, 5)?,
        amount_home: decimal_at(r, 6)?,
        account_id: r.get(7)?,
        category_id: r.get(8)?,
        transfer_id: r.get(9)?,
    })
}

pub(crate) fn find(conn: &Connection, user_id: i64, id: i64) -> LedgerResult<Option<Transaction>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM transactions t WHERE t.user_id=?1 AND t.id=?2"),
        params![user_id, id],
        row_to_transaction,
    )
    .optional()
    .op("Failed to load transaction.")
}

pub(crate) fn insert(conn: &Connection, user_id: i64, t: &Transaction) -> LedgerResult<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, date, description, amount_original, currency_original,
             exchange_rate, amount_home, account_id, category_id, transfer_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            user_id,
            t.date.to_string(),
            &t.description,
            t.amount_original.to_string(),
            &t.currency_original,
            t.exchange_rate.to_string(),
            t.amount_home.to_string(),
            t.account_id,
            t.category_id,
            t.transfer_id
        ],
    )
    .op("Failed to save new transaction.")?;
    Ok(conn.last_insert_rowid())
}

/// Record a transaction in its account's currency together with the home
/// currency value.
pub fn create_transaction(ctx: &AppContext, new: NewTransaction) -> LedgerResult<Transaction> {
    let user_id = ctx.user_id()?;
    let description = validate::required(&new.description, "Description")?;
    let amount = validate::check_amount(new.amount_original)?;
    let conn = ctx.conn();
    let account = accounts::find(conn, user_id, new.account_id)?
        .ok_or_else(|| LedgerError::validation("Invalid account selected."))?;
    if categories::find(conn, user_id, new.category_id)?.is_none() {
        return Err(LedgerError::validation("Category is required"));
    }
    let main = currencies::require_main(conn, user_id)?;
    let conv = convert(amount, &account.currency, &main, new.exchange_rate)?;

    let mut t = Transaction {
        id: 0,
        date: new.date,
        description,
        amount_original: amount,
        currency_original: account.currency,
        exchange_rate: conv.exchange_rate,
        amount_home: conv.amount_home,
        account_id: account.id,
        category_id: new.category_id,
        transfer_id: None,
    };
    t.id = insert(conn, user_id, &t)?;
    debug!(user_id, id = t.id, "transaction created");
    Ok(t)
}

/// Newest first, joined with account and category names.
pub fn list_transactions(
    ctx: &AppContext,
    filter: &TransactionFilter,
) -> LedgerResult<Vec<TransactionRow>> {
    let user_id = ctx.user_id()?;
    let mut sql = format!(
        "SELECT {COLUMNS}, a.name, a.currency, c.name, c.parent_id
         FROM transactions t
         JOIN accounts a ON a.id = t.account_id
         JOIN categories c ON c.id = t.category_id
         WHERE t.user_id=?"
    );
    let mut args: Vec<i64> = vec![user_id];
    if let Some(acct) = filter.account_id {
        sql.push_str(" AND t.account_id=?");
        args.push(acct);
    }
    if let Some(cat) = filter.category_id {
        sql.push_str(" AND t.category_id=?");
        args.push(cat);
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC LIMIT ?");
    let limit = i64::try_from(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .map_err(|_| LedgerError::validation("Limit is too large"))?;
    args.push(limit);

    let mut stmt = ctx.conn().prepare(&sql).op("Failed to load transactions.")?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args), |r| {
            Ok(TransactionRow {
                transaction: row_to_transaction(r)?,
                account_name: r.get(10)?,
                account_currency: r.get(11)?,
                category_name: r.get(12)?,
                category_parent_id: r.get(13)?,
            })
        })
        .op("Failed to load transactions.")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .op("Failed to load transactions.")
}

/// Partial edit. Amount or rate changes recompute the home amount against
/// the current main currency.
pub fn update_transaction(
    ctx: &AppContext,
    id: i64,
    upd: TransactionUpdate,
) -> LedgerResult<Transaction> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let mut t = find(conn, user_id, id)?.ok_or_else(|| LedgerError::not_found("Transaction", id))?;

    let reprices = upd.amount_original.is_some() || upd.exchange_rate.is_some();
    if reprices && t.transfer_id.is_some() {
        return Err(LedgerError::Conflict(
            "Amounts of a transfer leg cannot be edited; delete and re-create the transfer".into(),
        ));
    }
    if let Some(d) = upd.date {
        t.date = d;
    }
    if let Some(desc) = upd.description {
        t.description = validate::required(&desc, "Description")?;
    }
    if let Some(cat) = upd.category_id {
        if categories::find(conn, user_id, cat)?.is_none() {
            return Err(LedgerError::not_found("Category", cat));
        }
        t.category_id = cat;
    }
    if reprices {
        let amount = validate::check_amount(upd.amount_original.unwrap_or(t.amount_original))?;
        let main = currencies::require_main(conn, user_id)?;
        let rate = upd.exchange_rate.or(Some(t.exchange_rate));
        let conv = convert(amount, &t.currency_original, &main, rate)?;
        t.amount_original = amount;
        t.exchange_rate = conv.exchange_rate;
        t.amount_home = conv.amount_home;
    }
    conn.execute(
        "UPDATE transactions SET date=?3, description=?4, category_id=?5,
             amount_original=?6, exchange_rate=?7, amount_home=?8
         WHERE user_id=?1 AND id=?2",
        params![
            user_id,
            id,
            t.date.to_string(),
            &t.description,
            t.category_id,
            t.amount_original.to_string(),
            t.exchange_rate.to_string(),
            t.amount_home.to_string()
        ],
    )
    .op("Failed to update transaction.")?;
    Ok(t)
}

/// Deleting either leg of a transfer removes the whole transfer.
pub fn delete_transaction(ctx: &AppContext, id: i64) -> LedgerResult<()> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let t = find(conn, user_id, id)?.ok_or_else(|| LedgerError::not_found("Transaction", id))?;
    match t.transfer_id {
        Some(tid) => {
            conn.execute(
                "DELETE FROM transfers WHERE user_id=?1 AND id=?2",
                params![user_id, tid],
            )
            .op("Failed to delete transfer.")?;
        }
        None => {
            conn.execute(
                "DELETE FROM transactions WHERE user_id=?1 AND id=?2",
                params![user_id, id],
            )
            .op("Failed to delete transaction.")?;
        }
    }
    Ok(())
}
