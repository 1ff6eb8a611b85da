// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Write side: projects and income/expense entries.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::{SiteError, SiteResult};
use crate::models::TransactionKind;
use crate::utils::fmt_timestamp;

/// Payload of an income or expense entry. Only expenses carry a category.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionInput {
    Income {
        amount: Decimal,
        remarks: Option<String>,
    },
    Expense {
        amount: Decimal,
        remarks: Option<String>,
        category: String,
    },
}

impl TransactionInput {
    /// Builds the variant for `kind`, rejecting a missing expense category,
    /// a category on income, and negative amounts.
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        remarks: Option<String>,
        category: Option<String>,
    ) -> SiteResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(SiteError::InvalidInput(format!(
                "amount must not be negative, got {}",
                amount
            )));
        }
        match (kind, category) {
            (TransactionKind::Income, None) => Ok(TransactionInput::Income { amount, remarks }),
            (TransactionKind::Income, Some(_)) => Err(SiteError::InvalidInput(
                "income entries do not take a category".into(),
            )),
            (TransactionKind::Expense, Some(category)) => Ok(TransactionInput::Expense {
                amount,
                remarks,
                category,
            }),
            (TransactionKind::Expense, None) => Err(SiteError::InvalidInput(
                "expense entries require a category".into(),
            )),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionInput::Income { .. } => TransactionKind::Income,
            TransactionInput::Expense { .. } => TransactionKind::Expense,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            TransactionInput::Income { amount, .. } | TransactionInput::Expense { amount, .. } => {
                *amount
            }
        }
    }

    pub fn remarks(&self) -> Option<&str> {
        match self {
            TransactionInput::Income { remarks, .. }
            | TransactionInput::Expense { remarks, .. } => remarks.as_deref(),
        }
    }
}

/// Expense category id by exact name.
pub fn category_id(conn: &Connection, name: &str) -> SiteResult<i64> {
    conn.query_row(
        "SELECT id FROM expense_categories WHERE name=?1",
        params![name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| SiteError::not_found("expense category", name))
}

fn ensure_project(conn: &Connection, project_id: i64) -> SiteResult<()> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM sites WHERE id=?1", params![project_id], |r| {
            r.get(0)
        })
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| SiteError::not_found("project", project_id))
}

pub fn add_transaction(
    conn: &Connection,
    project_id: i64,
    input: &TransactionInput,
    at: DateTime<Utc>,
) -> SiteResult<i64> {
    ensure_project(conn, project_id)?;
    let amount = input.amount().to_string();
    let created_at = fmt_timestamp(&at);
    match input {
        TransactionInput::Income { .. } => {
            conn.execute(
                "INSERT INTO incomes(site_id, amount, remarks, created_at) VALUES (?1,?2,?3,?4)",
                params![project_id, amount, input.remarks(), created_at],
            )?;
        }
        TransactionInput::Expense { category, .. } => {
            let cat_id = category_id(conn, category)?;
            conn.execute(
                "INSERT INTO expenses(site_id, category_id, amount, remarks, created_at)
                 VALUES (?1,?2,?3,?4,?5)",
                params![project_id, cat_id, amount, input.remarks(), created_at],
            )?;
        }
    }
    let id = conn.last_insert_rowid();
    tracing::info!(project_id, id, kind = %input.kind(), amount = %input.amount(), "transaction added");
    Ok(id)
}

/// Replaces amount, remarks and (for expenses) category of an entry.
pub fn update_transaction(conn: &Connection, id: i64, input: &TransactionInput) -> SiteResult<()> {
    let kind = input.kind();
    let amount = input.amount().to_string();
    let changed = match input {
        TransactionInput::Income { .. } => conn.execute(
            "UPDATE incomes SET amount=?1, remarks=?2 WHERE id=?3",
            params![amount, input.remarks(), id],
        )?,
        TransactionInput::Expense { category, .. } => {
            let cat_id = category_id(conn, category)?;
            conn.execute(
                "UPDATE expenses SET amount=?1, remarks=?2, category_id=?3 WHERE id=?4",
                params![amount, input.remarks(), cat_id, id],
            )?
        }
    };
    if changed == 0 {
        return Err(SiteError::not_found(kind_entity(kind), id));
    }
    tracing::info!(id, %kind, "transaction updated");
    Ok(())
}

pub fn delete_transaction(conn: &Connection, kind: TransactionKind, id: i64) -> SiteResult<()> {
    let sql = format!("DELETE FROM {} WHERE id=?1", kind.table());
    let changed = conn.execute(&sql, params![id])?;
    if changed == 0 {
        return Err(SiteError::not_found(kind_entity(kind), id));
    }
    tracing::info!(id, %kind, "transaction deleted");
    Ok(())
}

fn kind_entity(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "income entry",
        TransactionKind::Expense => "expense entry",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub initial_quotation: Decimal,
    pub final_quotation: Decimal,
    pub status: String,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub initial_quotation: Option<Decimal>,
    pub final_quotation: Option<Decimal>,
    pub status: Option<String>,
}

/// Status id by name, ignoring case.
pub fn status_id(conn: &Connection, name: &str) -> SiteResult<i64> {
    conn.query_row(
        "SELECT id FROM site_statuses WHERE name=?1 COLLATE NOCASE",
        params![name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| SiteError::not_found("status", name))
}

fn check_quotation(label: &str, d: Decimal) -> SiteResult<()> {
    if d.is_sign_negative() && !d.is_zero() {
        return Err(SiteError::InvalidInput(format!(
            "{} must not be negative, got {}",
            label, d
        )));
    }
    Ok(())
}

pub fn add_project(conn: &Connection, project: &NewProject, at: DateTime<Utc>) -> SiteResult<i64> {
    let name = project.name.trim();
    if name.is_empty() {
        return Err(SiteError::InvalidInput("project name must not be empty".into()));
    }
    check_quotation("initial quotation", project.initial_quotation)?;
    check_quotation("final quotation", project.final_quotation)?;
    let sid = status_id(conn, &project.status)?;
    conn.execute(
        "INSERT INTO sites(name, initial_quotation, final_quotation, status_id, created_at)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            name,
            project.initial_quotation.to_string(),
            project.final_quotation.to_string(),
            sid,
            fmt_timestamp(&at)
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name, "project added");
    Ok(id)
}

pub fn edit_project(conn: &Connection, id: i64, patch: &ProjectPatch) -> SiteResult<()> {
    ensure_project(conn, id)?;
    let name = patch.name.as_deref().map(str::trim);
    if name.is_some_and(str::is_empty) {
        return Err(SiteError::InvalidInput("project name must not be empty".into()));
    }
    if let Some(q) = patch.initial_quotation {
        check_quotation("initial quotation", q)?;
    }
    if let Some(q) = patch.final_quotation {
        check_quotation("final quotation", q)?;
    }
    let sid = patch
        .status
        .as_deref()
        .map(|s| status_id(conn, s))
        .transpose()?;

    conn.execute(
        "UPDATE sites SET
            name=COALESCE(?1, name),
            initial_quotation=COALESCE(?2, initial_quotation),
            final_quotation=COALESCE(?3, final_quotation),
            status_id=COALESCE(?4, status_id)
         WHERE id=?5",
        params![
            name,
            patch.initial_quotation.map(|d| d.to_string()),
            patch.final_quotation.map(|d| d.to_string()),
            sid,
            id
        ],
    )?;
    tracing::info!(id, "project updated");
    Ok(())
}
