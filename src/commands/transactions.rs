// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregator::{expense_categories, KindFilter, TransactionFilter};
use crate::ledger::{self, TransactionInput};
use crate::models::{Transaction, TransactionKind};
use crate::source::{project_transactions, SqliteSource};
use crate::utils::{
    arg_str, maybe_print_json, opt_str, parse_amount, parse_id, parse_timestamp, pretty_table,
};
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn kind_of(sub: &clap::ArgMatches) -> Result<TransactionKind> {
    Ok(arg_str(sub, "kind")?.parse::<TransactionKind>()?)
}

fn input_from(sub: &clap::ArgMatches) -> Result<TransactionInput> {
    let kind = kind_of(sub)?;
    let amount = parse_amount(&arg_str(sub, "amount")?)?;
    let input = TransactionInput::new(
        kind,
        amount,
        opt_str(sub, "remarks"),
        opt_str(sub, "category"),
    )?;
    Ok(input)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = parse_id(&arg_str(sub, "project")?)?;
    let input = input_from(sub)?;
    let at = match opt_str(sub, "at") {
        Some(s) => parse_timestamp(&s)?,
        None => chrono::Utc::now(),
    };
    let id = ledger::add_transaction(conn, project_id, &input, at)
        .with_context(|| format!("Failed to add {}", input.kind()))?;
    println!(
        "Recorded {} #{} of {} on project #{}",
        input.kind(),
        id,
        input.amount(),
        project_id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(&arg_str(sub, "id")?)?;
    let input = input_from(sub)?;
    ledger::update_transaction(conn, id, &input)
        .with_context(|| format!("Failed to update {}", input.kind()))?;
    println!("Updated {} #{}", input.kind(), id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(&arg_str(sub, "id")?)?;
    let kind = kind_of(sub)?;
    ledger::delete_transaction(conn, kind, id)
        .with_context(|| format!("Failed to delete {}", kind))?;
    println!("Deleted {} #{}", kind, id);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub kind: TransactionKind,
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub remarks: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        TransactionRow {
            id: t.id,
            kind: t.kind,
            date: crate::utils::fmt_timestamp(&t.occurred_at),
            description: t.description.clone(),
            category: t.category.clone().unwrap_or_default(),
            amount: format!("{:.2}", t.amount),
            remarks: t.remarks.clone().unwrap_or_default(),
        }
    }
}

/// Timeline of a project after the kind, category, pattern and limit filters.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    Ok(query(conn, sub)?.0)
}

/// Filtered rows plus every expense category of the unfiltered timeline.
fn query(conn: &Connection, sub: &clap::ArgMatches) -> Result<(Vec<TransactionRow>, Vec<String>)> {
    let project_id = parse_id(&arg_str(sub, "project")?)?;
    let filter = TransactionFilter {
        kind: match opt_str(sub, "kind") {
            Some(k) => KindFilter::Only(k.parse()?),
            None => KindFilter::All,
        },
        category: opt_str(sub, "category"),
    };
    let pattern = opt_str(sub, "match")
        .map(|p| Regex::new(&p).map_err(|err| anyhow!("Invalid regex pattern '{}': {}", p, err)))
        .transpose()?;

    let transactions: Vec<Transaction> = project_transactions(&SqliteSource::new(conn), project_id)
        .with_context(|| format!("Loading transactions of project #{}", project_id))?;

    let rows = filter
        .apply(&transactions)
        .into_iter()
        .filter(|t| match &pattern {
            Some(re) => {
                re.is_match(&t.description) || t.remarks.as_deref().is_some_and(|r| re.is_match(r))
            }
            None => true,
        })
        .take(sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX))
        .map(TransactionRow::from)
        .collect();
    Ok((rows, expense_categories(&transactions)))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (data, categories) = match query(conn, sub) {
        Ok(found) => found,
        Err(err) if json_flag || jsonl_flag => return Err(err),
        Err(err) => {
            tracing::error!(error = %err, "transaction fetch failed");
            println!("No transactions to show: {:#}", err);
            return Ok(());
        }
    };
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("No transactions found");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.to_string(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.remarks.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Description", "Category", "Amount", "Remarks"],
                rows,
            )
        );
        if !categories.is_empty() {
            println!("Expense categories: {}", categories.join(", "));
        }
    }
    Ok(())
}
