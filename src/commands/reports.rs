// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::CategoryShare;
use crate::config::Settings;
use crate::source::{project_report, ProjectReport, SqliteSource};
use crate::utils::{arg_str, fmt_money, maybe_print_json, parse_id, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

/// Number of categories suggested for cost reduction.
const COST_REDUCTION_TOP: usize = 2;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub project: String,
    pub status: String,
    pub total_income: String,
    pub total_expense: String,
    pub net_balance: String,
    pub remaining_from_quote: String,
    pub progress: u8,
    pub breakdown: Vec<CategoryShare>,
    pub cost_reduction: Vec<String>,
    pub ongoing: bool,
}

pub fn summary_view(report: &ProjectReport) -> SummaryView {
    let s = &report.summary;
    let p = &report.overview.project;
    SummaryView {
        project: p.name.clone(),
        status: p.status.clone(),
        total_income: format!("{:.2}", s.total_income),
        total_expense: format!("{:.2}", s.total_expense),
        net_balance: format!("{:.2}", s.net_balance),
        remaining_from_quote: format!("{:.2}", report.remaining_from_quote),
        progress: report.overview.progress,
        breakdown: s.breakdown(),
        cost_reduction: s.cost_reduction_candidates(COST_REDUCTION_TOP).to_vec(),
        ongoing: p.is_ongoing(),
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = parse_id(&arg_str(sub, "project")?)?;
    let ccy = Settings::load(conn)?.currency;
    let report = project_report(&SqliteSource::new(conn), id)
        .with_context(|| format!("Building summary for project #{}", id))?;
    let view = summary_view(&report);
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    let s = &report.summary;
    let totals = vec![
        vec!["Total income".into(), fmt_money(&s.total_income, &ccy)],
        vec!["Total expenses".into(), fmt_money(&s.total_expense, &ccy)],
        vec!["Net balance".into(), fmt_money(&s.net_balance, &ccy)],
        vec![
            "Remaining from final quote".into(),
            fmt_money(&report.remaining_from_quote, &ccy),
        ],
        vec!["Progress".into(), format!("{}%", view.progress)],
    ];
    println!("Financial summary: {} ({})", view.project, view.status);
    println!("{}", pretty_table(&["", "Amount"], totals));

    if view.breakdown.is_empty() {
        println!("No expense data available");
        return Ok(());
    }
    let rows = view
        .breakdown
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.amount, &ccy),
                format!("{}%", c.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));

    println!("Cost reduction opportunities:");
    for category in &view.cost_reduction {
        println!(
            "  - {}: a significant portion of expenses; consider renegotiating with vendors or alternative suppliers.",
            category
        );
    }
    if view.ongoing {
        println!("  Project is ongoing: keep watching these categories to prevent cost overruns.");
    }
    Ok(())
}
