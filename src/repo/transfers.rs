// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::params;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{accounts, categories, currencies, transactions};
use crate::context::AppContext;
use crate::convert::{checked_product, implied_rate};
use crate::errors::{BackendContext, LedgerError, LedgerResult};
use crate::models::{CreateTransfer, Transaction, Transfer};
use crate::validate;

/// Move `amount` (in the source account's currency) between two accounts.
///
/// Produces a debit leg on the source and a credit leg on the destination,
/// linked by one transfer id. Rates come from stored rates on or before the
/// transfer date; if any required rate is missing nothing is written.
pub fn create_transfer(ctx: &mut AppContext, req: CreateTransfer) -> LedgerResult<Transfer> {
    let user_id = ctx.user_id()?;
    let description = validate::required(&req.description, "Description")?;
    let amount = validate::check_amount(req.amount)?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation("Transfer amount must be positive"));
    }
    if req.from_account_id == req.to_account_id {
        return Err(LedgerError::validation(
            "Source and destination accounts must differ",
        ));
    }

    let tx = ctx
        .conn_mut()
        .transaction()
        .op("Failed to create transfer.")?;

    let from = accounts::find(&tx, user_id, req.from_account_id)?
        .ok_or_else(|| LedgerError::not_found("Account", req.from_account_id))?;
    let to = accounts::find(&tx, user_id, req.to_account_id)?
        .ok_or_else(|| LedgerError::not_found("Account", req.to_account_id))?;
    if categories::find(&tx, user_id, req.category_id)?.is_none() {
        return Err(LedgerError::not_found("Category", req.category_id));
    }
    let main = currencies::require_main(&tx, user_id)?;

    let rate = |base: &str, quote: &str| -> LedgerResult<Decimal> {
        implied_rate(&tx, user_id, req.date, base, quote)?.ok_or_else(|| {
            warn!(base, quote, date = %req.date, "transfer rejected, no rate");
            LedgerError::validation(format!(
                "No exchange rate {}/{} on or before {}",
                base, quote, req.date
            ))
        })
    };

    let credit_amount = checked_product(amount, rate(&from.currency, &to.currency)?)?;
    let debit_rate = rate(&from.currency, &main)?;
    let credit_rate = rate(&to.currency, &main)?;
    let debit_home = checked_product(-amount, debit_rate)?;
    let credit_home = checked_product(credit_amount, credit_rate)?;

    tx.execute(
        "INSERT INTO transfers(user_id) VALUES (?1)",
        params![user_id],
    )
    .op("Failed to create transfer.")?;
    let transfer_id = tx.last_insert_rowid();

    let mut debit = Transaction {
        id: 0,
        date: req.date,
        description: description.clone(),
        amount_original: -amount,
        currency_original: from.currency.clone(),
        exchange_rate: debit_rate,
        amount_home: debit_home,
        account_id: from.id,
        category_id: req.category_id,
        transfer_id: Some(transfer_id),
    };
    let mut credit = Transaction {
        id: 0,
        date: req.date,
        description,
        amount_original: credit_amount,
        currency_original: to.currency.clone(),
        exchange_rate: credit_rate,
        amount_home: credit_home,
        account_id: to.id,
        category_id: req.category_id,
        transfer_id: Some(transfer_id),
    };
    debit.id = transactions::insert(&tx, user_id, &debit)?;
    credit.id = transactions::insert(&tx, user_id, &credit)?;
    tx.commit().op("Failed to create transfer.")?;

    debug!(user_id, transfer_id, "transfer created");
    Ok(Transfer {
        id: transfer_id,
        debit,
        credit,
    })
}

/// Both legs of a stored transfer, debit first.
pub fn get_transfer(ctx: &AppContext, transfer_id: i64) -> LedgerResult<Transfer> {
    let user_id = ctx.user_id()?;
    let mut stmt = ctx
        .conn()
        .prepare(
            "SELECT t.id, t.date, t.description, t.amount_original, t.currency_original,
                    t.exchange_rate, t.amount_home, t.account_id, t.category_id, t.transfer_id
             FROM transactions t WHERE t.user_id=?1 AND t.transfer_id=?2
             ORDER BY CAST(t.amount_original AS REAL) ASC, t.id ASC",
        )
        .op("Failed to load transfer.")?;
    let legs = stmt
        .query_map(params![user_id, transfer_id], transactions::row_to_transaction)
        .op("Failed to load transfer.")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .op("Failed to load transfer.")?;
    let mut legs = legs.into_iter();
    match (legs.next(), legs.next(), legs.next()) {
        (Some(debit), Some(credit), None) => Ok(Transfer {
            id: transfer_id,
            debit,
            credit,
        }),
        _ => Err(LedgerError::not_found("Transfer", transfer_id)),
    }
}
