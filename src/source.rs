// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read side of the ledger. Raw rows are validated into typed records here,
//! so the aggregator only ever sees well-formed input.

use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregator::{merge_transactions, summarize, FinancialSummary, ProjectOverview};
use crate::error::{SiteError, SiteResult};
use crate::models::{ExpenseRecord, IncomeRecord, Project, Transaction, TransactionKind};
use crate::utils::parse_instant;

/// Persistence collaborator the reporting code reads from.
pub trait RecordSource {
    fn fetch_income_records(&self, project_id: i64) -> SiteResult<Vec<IncomeRecord>>;
    fn fetch_expense_records(&self, project_id: i64) -> SiteResult<Vec<ExpenseRecord>>;
    fn fetch_project(&self, project_id: i64) -> SiteResult<Project>;
}

/// Fetches both record sets and merges them. A failure on either side
/// aborts the read; nothing is merged from the side that succeeded.
pub fn project_transactions<S: RecordSource + ?Sized>(
    source: &S,
    project_id: i64,
) -> SiteResult<Vec<Transaction>> {
    let income = source
        .fetch_income_records(project_id)
        .map_err(|e| SiteError::fetch(TransactionKind::Income, e))?;
    let expenses = source
        .fetch_expense_records(project_id)
        .map_err(|e| SiteError::fetch(TransactionKind::Expense, e))?;
    tracing::debug!(
        project_id,
        income = income.len(),
        expenses = expenses.len(),
        "merging project records"
    );
    Ok(merge_transactions(&income, &expenses))
}

/// Everything the project detail views render.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub overview: ProjectOverview,
    pub summary: FinancialSummary,
    pub remaining_from_quote: Decimal,
    pub transactions: Vec<Transaction>,
}

pub fn project_report<S: RecordSource + ?Sized>(
    source: &S,
    project_id: i64,
) -> SiteResult<ProjectReport> {
    let project = source.fetch_project(project_id)?;
    let transactions = project_transactions(source, project_id)?;
    let summary = summarize(&transactions)?;
    let remaining_from_quote = summary.remaining_from_quote(&project);
    Ok(ProjectReport {
        overview: ProjectOverview::new(project, &summary),
        summary,
        remaining_from_quote,
        transactions,
    })
}

pub struct SqliteSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Most recently created projects first.
    pub fn list_projects(&self, limit: usize) -> SiteResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY s.created_at DESC, s.id DESC LIMIT ?1",
            PROJECT_SELECT
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = stmt.query(params![limit])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(project_from_row(r)?);
        }
        Ok(out)
    }
}

const PROJECT_SELECT: &str = "SELECT s.id, s.name, s.initial_quotation, s.final_quotation, st.name, s.created_at
     FROM sites s JOIN site_statuses st ON st.id=s.status_id";

impl RecordSource for SqliteSource<'_> {
    fn fetch_income_records(&self, project_id: i64) -> SiteResult<Vec<IncomeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.site_id, i.amount, i.created_at, i.remarks, s.name
             FROM incomes i JOIN sites s ON s.id=i.site_id
             WHERE i.site_id=?1 ORDER BY i.id",
        )?;
        let mut rows = stmt.query(params![project_id])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let raw_amount = text_of(r.get::<_, Value>(2)?);
            let amount = raw_amount
                .as_deref()
                .and_then(parse_non_negative)
                .ok_or_else(|| SiteError::MalformedAmount {
                    table: "incomes",
                    id,
                    value: raw_amount.clone().unwrap_or_else(|| "NULL".into()),
                })?;
            out.push(IncomeRecord {
                id,
                project_id: r.get(1)?,
                amount,
                created_at: instant_of(r, 3, "incomes", id)?,
                remarks: r.get(4)?,
                project_name: r.get(5)?,
            });
        }
        Ok(out)
    }

    fn fetch_expense_records(&self, project_id: i64) -> SiteResult<Vec<ExpenseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id, e.site_id, e.amount, e.created_at, e.remarks, c.name, s.name
             FROM expenses e
             JOIN sites s ON s.id=e.site_id
             JOIN expense_categories c ON c.id=e.category_id
             WHERE e.site_id=?1 ORDER BY e.id",
        )?;
        let mut rows = stmt.query(params![project_id])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let amount = match text_of(r.get::<_, Value>(2)?) {
                None => None,
                Some(raw) => {
                    let parsed = parse_non_negative(&raw);
                    if parsed.is_none() {
                        tracing::warn!(id, value = %raw, "expense amount unreadable, counting as zero");
                    }
                    parsed
                }
            };
            out.push(ExpenseRecord {
                id,
                project_id: r.get(1)?,
                amount,
                created_at: instant_of(r, 3, "expenses", id)?,
                remarks: r.get(4)?,
                category_name: r.get(5)?,
                project_name: r.get(6)?,
            });
        }
        Ok(out)
    }

    fn fetch_project(&self, project_id: i64) -> SiteResult<Project> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE s.id=?1", PROJECT_SELECT))?;
        let mut rows = stmt.query(params![project_id])?;
        match rows.next()? {
            Some(r) => project_from_row(r),
            None => Err(SiteError::not_found("project", project_id)),
        }
    }
}

fn project_from_row(r: &Row<'_>) -> SiteResult<Project> {
    let id: i64 = r.get(0)?;
    let quotation = |idx: usize| -> SiteResult<Decimal> {
        let raw = text_of(r.get::<_, Value>(idx)?);
        raw.as_deref()
            .and_then(parse_non_negative)
            .ok_or_else(|| SiteError::MalformedAmount {
                table: "sites",
                id,
                value: raw.clone().unwrap_or_else(|| "NULL".into()),
            })
    };
    Ok(Project {
        id,
        name: r.get(1)?,
        initial_quotation: quotation(2)?,
        final_quotation: quotation(3)?,
        status: r.get(4)?,
        created_at: instant_of(r, 5, "sites", id)?,
    })
}

/// Looks up a project's display name without loading the whole row.
pub fn project_name(conn: &Connection, project_id: i64) -> SiteResult<String> {
    conn.query_row(
        "SELECT name FROM sites WHERE id=?1",
        params![project_id],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| SiteError::not_found("project", project_id))
}

fn text_of(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(_) => Some("<blob>".into()),
    }
}

fn parse_non_negative(raw: &str) -> Option<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .ok()
        .filter(|d| !d.is_sign_negative() || d.is_zero())
}

fn instant_of(
    r: &Row<'_>,
    idx: usize,
    table: &'static str,
    id: i64,
) -> SiteResult<chrono::DateTime<chrono::Utc>> {
    let raw: String = r.get(idx)?;
    parse_instant(&raw).ok_or(SiteError::InvalidTimestamp {
        table,
        id,
        value: raw,
    })
}
