// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::repo::reports::{self, Period};
use crate::utils::{arg, maybe_print_json, pretty_table, today};
use anyhow::Result;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => {
            let period = Period::parse(arg(sub, "period")?)?;
            let s = reports::transaction_summary(ctx, period, today())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![vec![
                    format!("{} .. {}", s.from, s.to),
                    format!("{:.2}", s.income),
                    format!("{:.2}", s.expense),
                    format!("{:.2}", s.net),
                    s.count.to_string(),
                ]];
                let net = format!("Net ({})", s.currency);
                println!(
                    "{}",
                    pretty_table(&["Period", "Income", "Expense", net.as_str(), "Count"], rows)
                );
            }
        }
        Some(("balances", sub)) => {
            let data = reports::account_balances(ctx, today())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|b| {
                        vec![
                            b.account,
                            b.currency,
                            format!("{:.2}", b.balance),
                            b.balance_home
                                .map(|h| format!("{:.2}", h))
                                .unwrap_or_else(|| "(no rate)".into()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Account", "CCY", "Balance", "Home"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
