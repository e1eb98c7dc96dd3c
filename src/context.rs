// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;

use crate::auth;
use crate::errors::{LedgerError, LedgerResult};
use crate::models::Session;

/// Data-access handle plus the current session, passed explicitly to every
/// repository call.
pub struct AppContext {
    conn: Connection,
    session: Option<Session>,
}

impl AppContext {
    pub fn new(conn: Connection, session: Option<Session>) -> Self {
        AppContext { conn, session }
    }

    /// Pick up whichever session is persisted in the database.
    pub fn load(conn: Connection) -> LedgerResult<Self> {
        let session = auth::current_session(&conn)?;
        Ok(AppContext { conn, session })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    /// Owner id of the signed-in user.
    pub fn user_id(&self) -> LedgerResult<i64> {
        self.session
            .as_ref()
            .map(|s| s.user_id)
            .ok_or(LedgerError::NotAuthenticated)
    }
}
