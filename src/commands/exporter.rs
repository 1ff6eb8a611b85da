// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::source::{project_transactions, SqliteSource};
use crate::utils::{arg_str, fmt_timestamp, parse_id};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg_str(sub, "format")?.to_lowercase();
    let out = arg_str(sub, "out")?;
    let project_id = parse_id(&arg_str(sub, "project")?)?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let transactions = project_transactions(&SqliteSource::new(conn), project_id)
        .with_context(|| format!("Loading transactions of project #{}", project_id))?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(&out)?;
            wtr.write_record([
                "id", "kind", "date", "description", "category", "amount", "remarks",
            ])?;
            for t in &transactions {
                wtr.write_record([
                    t.id.to_string(),
                    t.kind.to_string(),
                    fmt_timestamp(&t.occurred_at),
                    t.description.clone(),
                    t.category.clone().unwrap_or_default(),
                    t.amount.to_string(),
                    t.remarks.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = transactions
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "kind": t.kind,
                        "date": fmt_timestamp(&t.occurred_at),
                        "description": t.description,
                        "category": t.category,
                        "amount": t.amount.to_string(),
                        "remarks": t.remarks,
                    })
                })
                .collect();
            std::fs::write(&out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    tracing::info!(project_id, count = transactions.len(), out = %out, "exported transactions");
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
