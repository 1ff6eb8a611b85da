// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Attachment;
use crate::source::project_name;
use crate::utils::{arg_str, fmt_timestamp, maybe_print_json, parse_id, parse_instant, pretty_table};
use anyhow::{Result, anyhow, bail};
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let project_id = parse_id(&arg_str(sub, "project")?)?;
            let name = arg_str(sub, "name")?;
            let location = arg_str(sub, "location")?;
            if name.is_empty() || location.is_empty() {
                bail!("Attachment name and location must not be empty");
            }
            let id = add(conn, project_id, &name, &location)?;
            println!("Attached '{}' to project #{} (id {})", name, project_id, id);
        }
        Some(("list", sub)) => {
            let project_id = parse_id(&arg_str(sub, "project")?)?;
            let items = list_for_project(conn, project_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let data = items
                    .into_iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name,
                            a.location,
                            fmt_timestamp(&a.created_at),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Location", "Added"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(&arg_str(sub, "id")?)?;
            let n = conn.execute("DELETE FROM attachments WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Attachment {} not found", id);
            }
            tracing::info!(id, "attachment removed");
            println!("Removed attachment {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, project_id: i64, name: &str, location: &str) -> Result<i64> {
    project_name(conn, project_id)?;
    conn.execute(
        "INSERT INTO attachments(site_id, name, location, created_at) VALUES (?1,?2,?3,?4)",
        params![project_id, name, location, fmt_timestamp(&chrono::Utc::now())],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(project_id, id, name, "attachment added");
    Ok(id)
}

/// Newest first.
pub fn list_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Attachment>> {
    let mut stmt = conn.prepare(
        "SELECT id, site_id, name, location, created_at FROM attachments
         WHERE site_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![project_id])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let raw: String = r.get(4)?;
        out.push(Attachment {
            id,
            project_id: r.get(1)?,
            name: r.get(2)?,
            location: r.get(3)?,
            created_at: parse_instant(&raw)
                .ok_or_else(|| anyhow!("Invalid timestamp '{}' on attachment {}", raw, id))?,
        });
    }
    Ok(out)
}
