// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::repo::currencies;
use crate::utils::{arg, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let c = currencies::create_currency(ctx, arg(sub, "code")?)?;
            if c.is_main {
                println!("Added currency {} (main)", c.code);
            } else {
                println!("Added currency {}", c.code);
            }
        }
        Some(("list", sub)) => {
            let list = currencies::list_currencies(ctx)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
                let rows = list
                    .into_iter()
                    .map(|c| {
                        vec![
                            c.code,
                            if c.is_main { "yes".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Code", "Main"], rows));
            }
        }
        Some(("set-main", sub)) => {
            let code = arg(sub, "code")?;
            currencies::set_main_currency(ctx, code)?;
            println!("Main currency set to {}", code.trim().to_uppercase());
        }
        Some(("rename", sub)) => {
            let c = currencies::update_currency(ctx, arg(sub, "code")?, arg(sub, "to")?)?;
            println!("Currency renamed to {}", c.code);
        }
        Some(("rm", sub)) => {
            let code = arg(sub, "code")?;
            currencies::delete_currency(ctx, code)?;
            println!("Removed currency {}", code.trim().to_uppercase());
        }
        _ => {}
    }
    Ok(())
}
