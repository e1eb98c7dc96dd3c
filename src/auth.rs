// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local credential store and the persisted session.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::errors::{BackendContext, LedgerError, LedgerResult};
use crate::models::{Session, User};
use crate::validate;

const INVALID_LOGIN: &str = "Invalid login credentials";

pub struct SignUp<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

pub fn sign_up(conn: &Connection, form: SignUp<'_>) -> LedgerResult<Session> {
    sign_up_with_cost(conn, form, bcrypt::DEFAULT_COST)
}

/// Same as [`sign_up`] with an explicit bcrypt cost.
pub fn sign_up_with_cost(conn: &Connection, form: SignUp<'_>, cost: u32) -> LedgerResult<Session> {
    let first = validate::required(form.first_name, "First name")?;
    let last = validate::required(form.last_name, "Last name")?;
    let email = validate::email(form.email)?;
    validate::password(form.password)?;

    let taken: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE email=?1",
            params![&email],
            |r| r.get(0),
        )
        .optional()
        .op("Sign up failed.")?;
    if taken.is_some() {
        return Err(LedgerError::Conflict("User already registered".into()));
    }

    let hash = bcrypt::hash(form.password, cost)
        .map_err(|e| LedgerError::backend("Sign up failed.", e))?;
    conn.execute(
        "INSERT INTO users(email, first_name, last_name, password_hash) VALUES (?1,?2,?3,?4)",
        params![&email, first, last, hash],
    )
    .op("Sign up failed.")?;
    let user_id = conn.last_insert_rowid();
    info!(user_id, "signed up");
    start_session(conn, user_id)
}

pub fn sign_in(conn: &Connection, email: &str, password: &str) -> LedgerResult<Session> {
    let email = email.trim().to_lowercase();
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT id, password_hash FROM users WHERE email=?1",
            params![&email],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()
        .op("Sign in failed.")?;
    let Some((user_id, hash)) = row else {
        return Err(LedgerError::validation(INVALID_LOGIN));
    };
    let ok = bcrypt::verify(password, &hash)
        .map_err(|e| LedgerError::backend("Sign in failed.", e))?;
    if !ok {
        return Err(LedgerError::validation(INVALID_LOGIN));
    }
    info!(user_id, "signed in");
    start_session(conn, user_id)
}

pub fn sign_out(conn: &Connection) -> LedgerResult<()> {
    let n = conn
        .execute("DELETE FROM session", [])
        .op("Sign out failed. Please try again.")?;
    if n > 0 {
        info!("signed out");
    }
    Ok(())
}

pub fn current_session(conn: &Connection) -> LedgerResult<Option<Session>> {
    conn.query_row(
        "SELECT s.user_id, u.email, s.started_at FROM session s JOIN users u ON u.id = s.user_id",
        [],
        |r| {
            Ok(Session {
                user_id: r.get(0)?,
                email: r.get(1)?,
                started_at: r.get(2)?,
            })
        },
    )
    .optional()
    .op("Failed to load session.")
}

pub fn current_user(conn: &Connection) -> LedgerResult<Option<User>> {
    conn.query_row(
        "SELECT u.id, u.email, u.first_name, u.last_name FROM session s JOIN users u ON u.id = s.user_id",
        [],
        |r| {
            Ok(User {
                id: r.get(0)?,
                email: r.get(1)?,
                first_name: r.get(2)?,
                last_name: r.get(3)?,
            })
        },
    )
    .optional()
    .op("Failed to load user.")
}

fn start_session(conn: &Connection, user_id: i64) -> LedgerResult<Session> {
    conn.execute(
        "INSERT INTO session(id, user_id, started_at) VALUES (1, ?1, datetime('now'))
         ON CONFLICT(id) DO UPDATE SET user_id=excluded.user_id, started_at=excluded.started_at",
        params![user_id],
    )
    .op("Failed to start session.")?;
    current_session(conn)?.ok_or(LedgerError::NotAuthenticated)
}
