// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::models::{Category, CategoryUpdate, ParentRef};
use crate::repo::categories;
use crate::utils::{arg, maybe_print_json, opt_arg, parse_id, pretty_table};
use anyhow::Result;

fn print(sub: &clap::ArgMatches, list: Vec<Category>) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
        let rows = list
            .into_iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name,
                    c.parent_id.map(|p| p.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["ID", "Name", "Parent"], rows));
    }
    Ok(())
}

/// `group` subcommands: top-level categories only.
pub fn handle_groups(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let g = categories::create_grouping(ctx, arg(sub, "name")?)?;
            println!("Added group '{}' (id {})", g.name, g.id);
        }
        Some(("list", sub)) => print(sub, categories::list_groups(ctx)?)?,
        _ => {}
    }
    Ok(())
}

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let parent = ParentRef::parse(arg(sub, "parent")?)?;
            let c = categories::create_category(ctx, arg(sub, "name")?, parent)?;
            println!("Added category '{}' (id {})", c.name, c.id);
        }
        Some(("list", sub)) => {
            let list = if sub.get_flag("groups") {
                categories::list_groups(ctx)?
            } else if sub.get_flag("subs") {
                categories::list_sub_categories(ctx)?
            } else {
                categories::list_categories_and_groups(ctx)?
            };
            print(sub, list)?;
        }
        Some(("edit", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let upd = CategoryUpdate {
                name: opt_arg(sub, "name").map(str::to_string),
                parent: opt_arg(sub, "parent").map(ParentRef::parse).transpose()?,
            };
            let c = categories::update_category(ctx, id, upd)?;
            println!("Updated category '{}' (id {})", c.name, c.id);
        }
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            categories::delete_category(ctx, id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
