// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{parse_instant, pretty_table};
use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn amount_of(v: &Value) -> Option<Decimal> {
    match v {
        Value::Text(s) => s.trim().parse::<Decimal>().ok(),
        Value::Integer(i) => Some(Decimal::from(*i)),
        Value::Real(f) => Decimal::try_from(*f).ok(),
        _ => None,
    }
}

fn amount_ok(v: &Value) -> bool {
    amount_of(v).is_some_and(|d| !d.is_sign_negative() || d.is_zero())
}

/// Rows that reports would reject or silently zero.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Projects the card list cannot load, or that report 0% progress
    let mut stmt = conn.prepare(
        "SELECT id, name, initial_quotation, final_quotation, created_at FROM sites ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let initial: Value = r.get(2)?;
        let q: Value = r.get(3)?;
        let at: Value = r.get(4)?;
        if !amount_ok(&initial) || !amount_ok(&q) {
            rows.push(vec!["site_bad_quotation".into(), format!("#{} {}", id, name)]);
        } else if amount_of(&q).is_some_and(|d| d.is_zero()) {
            rows.push(vec!["site_zero_final_quote".into(), format!("#{} {}", id, name)]);
        }
        let at_ok = matches!(&at, Value::Text(s) if parse_instant(s).is_some());
        if !at_ok {
            rows.push(vec!["site_bad_timestamp".into(), format!("#{} {}", id, name)]);
        }
    }

    // 2) Income rows that fail the whole project read
    let mut stmt = conn.prepare("SELECT id, site_id, amount, created_at FROM incomes ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let site: i64 = r.get(1)?;
        let amount: Value = r.get(2)?;
        let at: String = r.get(3)?;
        if !amount_ok(&amount) {
            rows.push(vec![
                "income_malformed_amount".into(),
                format!("#{} (site {})", id, site),
            ]);
        }
        if parse_instant(&at).is_none() {
            rows.push(vec!["income_bad_timestamp".into(), format!("#{} {}", id, at)]);
        }
    }

    // 3) Expense rows counted as zero
    let mut stmt =
        conn.prepare("SELECT id, site_id, amount, created_at FROM expenses ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let site: i64 = r.get(1)?;
        let amount: Value = r.get(2)?;
        let at: String = r.get(3)?;
        if matches!(amount, Value::Null) {
            rows.push(vec![
                "expense_missing_amount".into(),
                format!("#{} (site {})", id, site),
            ]);
        } else if !amount_ok(&amount) {
            rows.push(vec![
                "expense_zeroed_amount".into(),
                format!("#{} (site {})", id, site),
            ]);
        }
        if parse_instant(&at).is_none() {
            rows.push(vec!["expense_bad_timestamp".into(), format!("#{} {}", id, at)]);
        }
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
