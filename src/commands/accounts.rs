// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::models::{AccountType, AccountUpdate, NewAccount};
use crate::repo::accounts;
use crate::utils::{arg, maybe_print_json, opt_arg, parse_id, pretty_table};
use crate::validate;
use anyhow::Result;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewAccount {
                name: arg(sub, "name")?.to_string(),
                r#type: arg(sub, "type")?.parse::<AccountType>()?,
                starting_balance: validate::parse_amount(arg(sub, "balance")?)?,
                currency: arg(sub, "currency")?.to_string(),
            };
            let a = accounts::create_account(ctx, new)?;
            println!(
                "Added account '{}' (id {}, {}, {})",
                a.name, a.id, a.r#type, a.currency
            );
        }
        Some(("list", sub)) => {
            let list = accounts::list_accounts(ctx)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
                let rows = list
                    .into_iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name,
                            a.r#type.to_string(),
                            a.currency,
                            format!("{:.2}", a.starting_balance),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Type", "Currency", "Starting"], rows)
                );
            }
        }
        Some(("edit", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let upd = AccountUpdate {
                name: opt_arg(sub, "name").map(str::to_string),
                r#type: opt_arg(sub, "type")
                    .map(|s| s.parse::<AccountType>())
                    .transpose()?,
                starting_balance: opt_arg(sub, "balance")
                    .map(validate::parse_amount)
                    .transpose()?,
                currency: opt_arg(sub, "currency").map(str::to_string),
            };
            let a = accounts::update_account(ctx, id, upd)?;
            println!("Updated account '{}' (id {})", a.name, a.id);
        }
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            accounts::delete_account(ctx, id)?;
            println!("Removed account {}", id);
        }
        _ => {}
    }
    Ok(())
}
