// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::models::{CreateTransfer, NewTransaction, TransactionFilter, TransactionUpdate};
use crate::repo::{transactions, transfers};
use crate::utils::{
    arg, fmt_money, maybe_print_json, opt_arg, parse_date, parse_id, pretty_table, today,
};
use crate::validate;
use anyhow::Result;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            transactions::delete_transaction(ctx, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let new = NewTransaction {
        date,
        description: arg(sub, "description")?.to_string(),
        amount_original: validate::parse_amount(arg(sub, "amount")?)?,
        account_id: parse_id(arg(sub, "account")?)?,
        category_id: parse_id(arg(sub, "category")?)?,
        exchange_rate: validate::parse_rate(opt_arg(sub, "rate"))?,
    };
    let t = transactions::create_transaction(ctx, new)?;
    println!(
        "Recorded {} on {} (home {:.2}, rate {})",
        fmt_money(&t.amount_original, &t.currency_original),
        t.date,
        t.amount_home.round_dp(2),
        t.exchange_rate
    );
    Ok(())
}

pub fn filter_from(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        account_id: opt_arg(sub, "account").map(parse_id).transpose()?,
        category_id: opt_arg(sub, "category").map(parse_id).transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

fn list(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let data = transactions::list_transactions(ctx, &filter_from(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let t = &r.transaction;
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    r.account_name.clone(),
                    t.description.clone(),
                    format!("{:.2}", t.amount_original),
                    t.currency_original.clone(),
                    t.exchange_rate.to_string(),
                    format!("{:.2}", t.amount_home.round_dp(2)),
                    r.category_name.clone(),
                    t.transfer_id.map(|x| x.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Date", "Account", "Description", "Amount", "CCY", "Rate", "Home",
                    "Category", "Transfer",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let upd = TransactionUpdate {
        date: opt_arg(sub, "date").map(parse_date).transpose()?,
        description: opt_arg(sub, "description").map(str::to_string),
        category_id: opt_arg(sub, "category").map(parse_id).transpose()?,
        amount_original: opt_arg(sub, "amount")
            .map(validate::parse_amount)
            .transpose()?,
        exchange_rate: validate::parse_rate(opt_arg(sub, "rate"))?,
    };
    let t = transactions::update_transaction(ctx, id, upd)?;
    println!(
        "Updated transaction {} (home {:.2})",
        t.id,
        t.amount_home.round_dp(2)
    );
    Ok(())
}

pub fn handle_transfer(ctx: &mut AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let req = CreateTransfer {
        date,
        description: arg(sub, "description")?.to_string(),
        amount: validate::parse_amount(arg(sub, "amount")?)?,
        from_account_id: parse_id(arg(sub, "from")?)?,
        to_account_id: parse_id(arg(sub, "to")?)?,
        category_id: parse_id(arg(sub, "category")?)?,
    };
    let tr = transfers::create_transfer(ctx, req)?;
    println!(
        "Transfer {}: {} -> {}",
        tr.id,
        fmt_money(&tr.debit.amount_original, &tr.debit.currency_original),
        fmt_money(&tr.credit.amount_original, &tr.credit.currency_original)
    );
    Ok(())
}
