// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::status_id;
use crate::utils::{arg_str, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg_str(sub, "name")?;
            if name.is_empty() {
                bail!("Status name must not be empty");
            }
            conn.execute("INSERT INTO site_statuses(name) VALUES (?1)", params![name])?;
            println!("Added status '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT st.name, COUNT(s.id) FROM site_statuses st
                 LEFT JOIN sites s ON s.status_id=st.id
                 GROUP BY st.id ORDER BY st.id",
            )?;
            let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
            let mut data = Vec::new();
            for row in rows {
                let (name, n) = row?;
                data.push(vec![name, n.to_string()]);
            }
            println!("{}", pretty_table(&["Status", "Projects"], data));
        }
        Some(("rm", sub)) => {
            let name = arg_str(sub, "name")?;
            let id = status_id(conn, &name)?;
            let in_use: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sites WHERE status_id=?1",
                params![id],
                |r| r.get(0),
            )?;
            if in_use > 0 {
                bail!("Status '{}' is used by {} project(s)", name, in_use);
            }
            conn.execute("DELETE FROM site_statuses WHERE id=?1", params![id])?;
            println!("Removed status '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
