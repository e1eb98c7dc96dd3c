// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::convert::convert;
use crate::repo::{currencies, rates};
use crate::utils::{arg, maybe_print_json, opt_arg, parse_date, pretty_table, today};
use crate::validate;
use anyhow::{Context, Result};

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-rate", sub)) => {
            let date = parse_date(arg(sub, "date")?)?;
            let rate = validate::parse_rate(Some(arg(sub, "rate")?))?
                .context("Exchange rate is required")?;
            let r = rates::set_rate(ctx, date, arg(sub, "base")?, arg(sub, "quote")?, rate)?;
            println!("{} 1 {} = {} {}", r.date, r.base, r.rate, r.quote);
        }
        Some(("list", sub)) => {
            let limit = sub.get_one::<usize>("limit").copied().unwrap_or(50);
            let list = rates::list_rates(ctx, limit)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
                let rows = list
                    .into_iter()
                    .map(|r| vec![r.date.to_string(), r.base, r.quote, r.rate.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Date", "Base", "Quote", "Rate"], rows));
            }
        }
        Some(("fetch", sub)) => {
            let days = sub.get_one::<i64>("days").copied().unwrap_or(120);
            let n = rates::fetch_rates(ctx, days, today())?;
            if n == 0 {
                println!("No new rates stored.");
            } else {
                println!("Stored {} rates via Frankfurter (ECB).", n);
            }
        }
        Some(("convert", sub)) => convert_amount(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

/// Preview of what a transaction in `currency` would record. Without --rate
/// the stored rate for the date is used.
fn convert_amount(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = ctx.user_id()?;
    let amount = validate::parse_amount(arg(sub, "amount")?)?;
    let currency = validate::currency_code(arg(sub, "currency")?)?;
    let date = match opt_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let main = currencies::main_currency(ctx)?
        .context("No main currency set. Please set a main currency first.")?
        .code;
    let rate = match validate::parse_rate(opt_arg(sub, "rate"))? {
        Some(r) => Some(r),
        None => crate::convert::implied_rate(ctx.conn(), user_id, date, &currency, &main)?,
    };
    let c = convert(amount, &currency, &main, rate)?;
    println!(
        "{} {} -> {:.4} {} (rate {})",
        amount, currency, c.amount_home, main, c.exchange_rate
    );
    Ok(())
}
