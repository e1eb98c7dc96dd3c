// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::repo::management;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let items = management::management_items(ctx)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
            let rows = items
                .iter()
                .map(|i| vec![i.kind().to_string(), i.label()])
                .collect();
            println!("{}", pretty_table(&["Kind", "Item"], rows));
        }
    }
    Ok(())
}
