// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use homeledger::auth::{self, SignUp};
use homeledger::context::AppContext;
use homeledger::db;
use homeledger::models::{AccountType, NewAccount};
use homeledger::repo::{accounts, categories, currencies};
use rust_decimal::Decimal;

/// Lowest bcrypt cost keeps the suite fast.
pub const TEST_COST: u32 = 4;

pub fn sign_up(ctx: &AppContext, email: &str) -> homeledger::models::Session {
    auth::sign_up_with_cost(
        ctx.conn(),
        SignUp {
            first_name: "Ada",
            last_name: "Lovelace",
            email,
            password: "secret-pw",
        },
        TEST_COST,
    )
    .unwrap()
}

pub fn signed_in() -> AppContext {
    let conn = db::open_in_memory().unwrap();
    let mut ctx = AppContext::new(conn, None);
    let s = sign_up(&ctx, "ada@example.com");
    ctx.set_session(Some(s));
    ctx
}

/// Signed-in user whose registry holds `codes`; the first one is main.
pub fn with_currencies(codes: &[&str]) -> AppContext {
    let ctx = signed_in();
    for c in codes {
        currencies::create_currency(&ctx, c).unwrap();
    }
    ctx
}

pub fn account(ctx: &AppContext, name: &str, ccy: &str, balance: Decimal) -> i64 {
    accounts::create_account(
        ctx,
        NewAccount {
            name: name.into(),
            r#type: AccountType::Checking,
            starting_balance: balance,
            currency: ccy.into(),
        },
    )
    .unwrap()
    .id
}

/// A group with one sub-category; returns the sub-category id.
pub fn category(ctx: &AppContext, group: &str, name: &str) -> i64 {
    let g = categories::create_grouping(ctx, group).unwrap();
    categories::create_category(ctx, name, homeledger::models::ParentRef::Group(g.id))
        .unwrap()
        .id
}
