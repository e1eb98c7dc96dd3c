// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const DB_ENV: &str = "HOMELEDGER_DB";
pub const LOG_ENV: &str = "HOMELEDGER_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Explicit values win; otherwise fall back to the environment and then
    /// to the platform data directory.
    pub fn resolve(db: Option<PathBuf>, log_level: Option<String>) -> Result<Self> {
        let db_path = match db {
            Some(p) => p,
            None => match std::env::var_os(DB_ENV) {
                Some(p) if !p.is_empty() => PathBuf::from(p),
                _ => crate::db::default_db_path()?,
            },
        };
        let log_filter = log_level
            .or_else(|| std::env::var(LOG_ENV).ok())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Config {
            db_path,
            log_filter,
        })
    }

    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db = m.get_one::<String>("db").map(PathBuf::from);
        let log = m.get_one::<String>("log-level").cloned();
        Self::resolve(db, log)
    }

    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
        // try_init: a second call (tests, embedding) keeps the first subscriber
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
