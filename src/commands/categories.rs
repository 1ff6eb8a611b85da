// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::category_id;
use crate::utils::{arg_str, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg_str(sub, "name")?;
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            conn.execute(
                "INSERT INTO expense_categories(name) VALUES (?1)",
                params![name],
            )?;
            println!("Added expense category '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT name FROM expense_categories ORDER BY name")?;
            let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
            let mut data = Vec::new();
            for row in rows {
                data.push(vec![row?]);
            }
            println!("{}", pretty_table(&["Expense category"], data));
        }
        Some(("rm", sub)) => {
            let name = arg_str(sub, "name")?;
            let id = category_id(conn, &name)?;
            let in_use: i64 = conn.query_row(
                "SELECT COUNT(*) FROM expenses WHERE category_id=?1",
                params![id],
                |r| r.get(0),
            )?;
            if in_use > 0 {
                bail!("Expense category '{}' is used by {} expense(s)", name, in_use);
            }
            conn.execute("DELETE FROM expense_categories WHERE id=?1", params![id])?;
            println!("Removed expense category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
