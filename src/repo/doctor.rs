// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::params;
use rust_decimal::Decimal;
use serde::Serialize;

use super::decimal_at;
use crate::context::AppContext;
use crate::errors::{BackendContext, LedgerResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

fn issue(kind: &'static str, detail: impl Into<String>) -> Issue {
    Issue {
        kind,
        detail: detail.into(),
    }
}

const OP: &str = "Failed to scan ledger.";

/// Look for stored data that breaks the ledger's rules. An empty result
/// means nothing was found.
pub fn scan(ctx: &AppContext) -> LedgerResult<Vec<Issue>> {
    let user_id = ctx.user_id()?;
    let conn = ctx.conn();
    let mut out = Vec::new();

    // 1) main currency count
    let (total, mains): (i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), IFNULL(SUM(is_main), 0) FROM currencies WHERE user_id=?1",
            params![user_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .op(OP)?;
    if total > 0 && mains != 1 {
        out.push(issue(
            "main_currency_count",
            format!("{} main currencies among {}", mains, total),
        ));
    }

    // 2) account currency outside the registry
    let mut stmt = conn
        .prepare(
            "SELECT a.name, a.currency FROM accounts a
             WHERE a.user_id=?1 AND NOT EXISTS (
                SELECT 1 FROM currencies c WHERE c.user_id=a.user_id AND c.code=a.currency)",
        )
        .op(OP)?;
    let mut cur = stmt.query(params![user_id]).op(OP)?;
    while let Some(r) = cur.next().op(OP)? {
        let name: String = r.get(0).op(OP)?;
        let ccy: String = r.get(1).op(OP)?;
        out.push(issue("account_currency_unknown", format!("{} ({})", name, ccy)));
    }

    // 3) nesting deeper than one level
    let mut stmt = conn
        .prepare(
            "SELECT c.name, p.name FROM categories c JOIN categories p ON p.id = c.parent_id
             WHERE c.user_id=?1 AND p.parent_id IS NOT NULL",
        )
        .op(OP)?;
    let mut cur = stmt.query(params![user_id]).op(OP)?;
    while let Some(r) = cur.next().op(OP)? {
        let child: String = r.get(0).op(OP)?;
        let parent: String = r.get(1).op(OP)?;
        out.push(issue("category_nested_too_deep", format!("{} under {}", child, parent)));
    }

    // 4) transfers that do not have exactly two legs
    let mut stmt = conn
        .prepare(
            "SELECT tr.id, COUNT(t.id) FROM transfers tr
             LEFT JOIN transactions t ON t.transfer_id = tr.id
             WHERE tr.user_id=?1 GROUP BY tr.id HAVING COUNT(t.id) <> 2",
        )
        .op(OP)?;
    let mut cur = stmt.query(params![user_id]).op(OP)?;
    while let Some(r) = cur.next().op(OP)? {
        let id: i64 = r.get(0).op(OP)?;
        let legs: i64 = r.get(1).op(OP)?;
        out.push(issue("transfer_legs", format!("transfer {} has {} leg(s)", id, legs)));
    }

    // 5) stored home amount disagrees with amount x rate
    let mut stmt = conn
        .prepare(
            "SELECT id, amount_original, exchange_rate, amount_home FROM transactions WHERE user_id=?1",
        )
        .op(OP)?;
    let mut cur = stmt.query(params![user_id]).op(OP)?;
    while let Some(r) = cur.next().op(OP)? {
        let id: i64 = r.get(0).op(OP)?;
        let amount: Decimal = decimal_at(r, 1).op(OP)?;
        let rate: Decimal = decimal_at(r, 2).op(OP)?;
        let home: Decimal = decimal_at(r, 3).op(OP)?;
        match amount.checked_mul(rate) {
            Some(p) if p == home => {}
            Some(_) => out.push(issue(
                "amount_home_mismatch",
                format!("transaction {}: {} x {} != {}", id, amount, rate, home),
            )),
            None => out.push(issue(
                "amount_home_mismatch",
                format!("transaction {}: {} x {} overflows", id, amount, rate),
            )),
        }
    }

    // 6) transaction recorded in a currency other than its account's
    let mut stmt = conn
        .prepare(
            "SELECT t.id, t.currency_original, a.name, a.currency FROM transactions t
             JOIN accounts a ON a.id = t.account_id
             WHERE t.user_id=?1 AND t.currency_original <> a.currency",
        )
        .op(OP)?;
    let mut cur = stmt.query(params![user_id]).op(OP)?;
    while let Some(r) = cur.next().op(OP)? {
        let id: i64 = r.get(0).op(OP)?;
        let tx_ccy: String = r.get(1).op(OP)?;
        let name: String = r.get(2).op(OP)?;
        let acct_ccy: String = r.get(3).op(OP)?;
        out.push(issue(
            "transaction_currency_mismatch",
            format!("transaction {} in {} on {} ({})", id, tx_ccy, name, acct_ccy),
        ));
    }

    Ok(out)
}
