// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::debug;

use homeledger::{cli, commands, config::Config, context::AppContext, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_matches(&matches)?;
    config.init_logging();
    debug!(?config, "starting");

    let conn = db::open_or_init(&config.db_path)?;
    let mut ctx = AppContext::load(conn)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("auth", sub)) => commands::auth::handle(&mut ctx, sub)?,
        Some(("currency", sub)) => commands::currencies::handle(&mut ctx, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&ctx, sub)?,
        Some(("group", sub)) => commands::categories::handle_groups(&ctx, sub)?,
        Some(("category", sub)) => commands::categories::handle(&ctx, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&ctx, sub)?,
        Some(("transfer", sub)) => commands::transactions::handle_transfer(&mut ctx, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&ctx, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ctx, sub)?,
        Some(("manage", sub)) => commands::manage::handle(&ctx, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&ctx)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
