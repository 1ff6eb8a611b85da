// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, Settings};
use crate::utils::{arg_str, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => {
            let s = Settings::load(conn)?;
            let data = vec![
                vec![config::KEY_CURRENCY.to_string(), s.currency],
                vec![config::KEY_LIST_LIMIT.to_string(), s.list_limit.to_string()],
            ];
            println!("{}", pretty_table(&["Key", "Value"], data));
        }
        Some(("get", sub)) => {
            let key = arg_str(sub, "key")?;
            let s = Settings::load(conn)?;
            match key.as_str() {
                config::KEY_CURRENCY => println!("{}", s.currency),
                config::KEY_LIST_LIMIT => println!("{}", s.list_limit),
                other => anyhow::bail!(
                    "Unknown setting '{}' (known: {})",
                    other,
                    config::KNOWN_KEYS.join(", ")
                ),
            }
        }
        Some(("set", sub)) => {
            let key = arg_str(sub, "key")?;
            let value = arg_str(sub, "value")?;
            config::set(conn, &key, &value)?;
            println!("Set {} = {}", key, config::get(conn, &key)?.unwrap_or_default());
        }
        _ => {}
    }
    Ok(())
}
