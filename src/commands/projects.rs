// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::{summarize, ProjectOverview};
use crate::config::Settings;
use crate::ledger::{self, NewProject, ProjectPatch};
use crate::source::{project_report, project_transactions, SqliteSource};
use crate::utils::{
    arg_str, fmt_money, maybe_print_json, opt_str, parse_amount, parse_id, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project = NewProject {
        name: arg_str(sub, "name")?,
        initial_quotation: parse_amount(&arg_str(sub, "initial")?)?,
        final_quotation: parse_amount(&arg_str(sub, "final")?)?,
        status: opt_str(sub, "status").unwrap_or_else(|| "Ongoing".into()),
    };
    let id = ledger::add_project(conn, &project, chrono::Utc::now())?;
    println!("Added project #{} '{}'", id, project.name);
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(&arg_str(sub, "id")?)?;
    let patch = ProjectPatch {
        name: opt_str(sub, "name"),
        initial_quotation: opt_str(sub, "initial")
            .map(|s| parse_amount(&s))
            .transpose()?,
        final_quotation: opt_str(sub, "final").map(|s| parse_amount(&s)).transpose()?,
        status: opt_str(sub, "status"),
    };
    if patch == ProjectPatch::default() {
        println!("Nothing to change for project #{}", id);
        return Ok(());
    }
    ledger::edit_project(conn, id, &patch)?;
    println!("Updated project #{}", id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub initial_quotation: String,
    pub final_quotation: String,
    pub received: Option<String>,
    pub expenses: Option<String>,
    pub profit_or_loss: Option<String>,
    pub progress: Option<u8>,
}

/// Project cards, newest first. A project whose records cannot be read is
/// still listed, without figures.
pub fn query_rows(conn: &Connection, limit: usize) -> Result<Vec<ProjectRow>> {
    let source = SqliteSource::new(conn);
    let mut out = Vec::new();
    for project in source.list_projects(limit)? {
        let mut row = ProjectRow {
            id: project.id,
            name: project.name.clone(),
            status: project.status.clone(),
            initial_quotation: format!("{:.2}", project.initial_quotation),
            final_quotation: format!("{:.2}", project.final_quotation),
            received: None,
            expenses: None,
            profit_or_loss: None,
            progress: None,
        };
        match project_transactions(&source, project.id).and_then(|txs| summarize(&txs)) {
            Ok(summary) => {
                let overview = ProjectOverview::new(project, &summary);
                row.received = Some(format!("{:.2}", overview.amount_received));
                row.expenses = Some(format!("{:.2}", overview.expenses));
                row.profit_or_loss = Some(format!("{:.2}", overview.profit_or_loss));
                row.progress = Some(overview.progress);
            }
            Err(err) => {
                tracing::warn!(project_id = row.id, error = %err, "skipping project figures");
            }
        }
        out.push(row);
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = match sub.get_one::<usize>("limit") {
        Some(n) => *n,
        None => Settings::load(conn)?.list_limit,
    };
    let data = query_rows(conn, limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let na = || "n/a".to_string();
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.name,
                    r.status,
                    r.initial_quotation,
                    r.final_quotation,
                    r.received.unwrap_or_else(na),
                    r.progress.map(|p| format!("{}%", p)).unwrap_or_else(na),
                    r.expenses.unwrap_or_else(na),
                    r.profit_or_loss.unwrap_or_else(na),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Project", "Status", "Initial", "Final", "Received", "Progress",
                    "Expenses", "Profit/Loss",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = parse_id(&arg_str(sub, "id")?)?;
    let ccy = Settings::load(conn)?.currency;
    let report = project_report(&SqliteSource::new(conn), id)
        .with_context(|| format!("Loading project #{}", id))?;
    let overview = &report.overview;
    if maybe_print_json(json_flag, jsonl_flag, overview)? {
        return Ok(());
    }
    let p = &overview.project;
    let pl_label = if overview.is_profitable() {
        "Profit"
    } else {
        "Loss"
    };
    let data = vec![
        vec!["Project".into(), format!("{} (#{})", p.name, p.id)],
        vec!["Status".into(), p.status.clone()],
        vec!["Initial quote".into(), fmt_money(&p.initial_quotation, &ccy)],
        vec!["Final quote".into(), fmt_money(&p.final_quotation, &ccy)],
        vec![
            "Amount received".into(),
            format!(
                "{} ({}% of final quote)",
                fmt_money(&overview.amount_received, &ccy),
                overview.progress
            ),
        ],
        vec!["Expenses".into(), fmt_money(&overview.expenses, &ccy)],
        vec![
            pl_label.into(),
            fmt_money(&overview.profit_or_loss.abs(), &ccy),
        ],
    ];
    println!("{}", pretty_table(&["Field", "Value"], data));
    Ok(())
}
