// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{SiteError, SiteResult};

pub const KEY_CURRENCY: &str = "currency";
pub const KEY_LIST_LIMIT: &str = "list_limit";
pub const KNOWN_KEYS: [&str; 2] = [KEY_CURRENCY, KEY_LIST_LIMIT];

/// User preferences persisted in the `settings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub currency: String,
    pub list_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            list_limit: 20,
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> SiteResult<Self> {
        let mut settings = Settings::default();
        if let Some(ccy) = get(conn, KEY_CURRENCY)? {
            settings.currency = ccy;
        }
        if let Some(raw) = get(conn, KEY_LIST_LIMIT)? {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => settings.list_limit = n,
                _ => tracing::warn!(value = %raw, "ignoring invalid list_limit setting"),
            }
        }
        Ok(settings)
    }
}

pub fn get(conn: &Connection, key: &str) -> SiteResult<Option<String>> {
    let v = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Validates and stores a setting.
pub fn set(conn: &Connection, key: &str, value: &str) -> SiteResult<()> {
    let value = value.trim();
    let normalized = match key {
        KEY_CURRENCY => {
            if value.is_empty() {
                return Err(SiteError::InvalidInput("currency must not be empty".into()));
            }
            value.to_uppercase()
        }
        KEY_LIST_LIMIT => match value.parse::<usize>() {
            Ok(n) if n > 0 => n.to_string(),
            _ => {
                return Err(SiteError::InvalidInput(format!(
                    "list_limit must be a positive integer, got '{}'",
                    value
                )));
            }
        },
        other => return Err(SiteError::not_found("setting", other)),
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalized],
    )?;
    tracing::info!(key, value = %normalized, "setting updated");
    Ok(())
}
