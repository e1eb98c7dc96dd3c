// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;
use tracing::error;

/// Errors returned across the repository boundary. Nothing below this type
/// panics; callers decide whether to surface the message to the user.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("User not authenticated.")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{op} DB Error: {message}")]
    Backend { op: &'static str, message: String },
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Wrap a storage failure with the operation that triggered it and log it.
    pub fn backend(op: &'static str, err: impl std::fmt::Display) -> Self {
        error!(op, "{}", err);
        LedgerError::Backend {
            op,
            message: err.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LedgerError::Conflict(_))
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Adapter for `rusqlite::Result` so repository code can write
/// `stmt.execute(..).op("Failed to create account.")?`.
pub trait BackendContext<T> {
    fn op(self, op: &'static str) -> LedgerResult<T>;
}

impl<T> BackendContext<T> for rusqlite::Result<T> {
    fn op(self, op: &'static str) -> LedgerResult<T> {
        self.map_err(|e| LedgerError::backend(op, e))
    }
}
