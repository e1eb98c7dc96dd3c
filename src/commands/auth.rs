// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{self, SignUp};
use crate::context::AppContext;
use crate::utils::arg;
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => {
            let session = auth::sign_up(
                ctx.conn(),
                SignUp {
                    first_name: arg(sub, "first")?,
                    last_name: arg(sub, "last")?,
                    email: arg(sub, "email")?,
                    password: arg(sub, "password")?,
                },
            )?;
            println!("Signed up and signed in as {}", session.email);
            ctx.set_session(Some(session));
        }
        Some(("login", sub)) => {
            let session = auth::sign_in(ctx.conn(), arg(sub, "email")?, arg(sub, "password")?)?;
            println!("Signed in as {}", session.email);
            ctx.set_session(Some(session));
        }
        Some(("logout", _)) => {
            auth::sign_out(ctx.conn())?;
            ctx.set_session(None);
            println!("Signed out");
        }
        Some(("whoami", _)) => match auth::current_user(ctx.conn())? {
            Some(u) => println!("{} {} <{}>", u.first_name, u.last_name, u.email),
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
