// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Builds the unified transaction timeline of a project and the figures
//! derived from it. Everything here is a pure function of its inputs.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{SiteError, SiteResult};
use crate::models::{ExpenseRecord, IncomeRecord, Project, Transaction, TransactionKind};

/// Maps both record sets to transactions and orders them most recent first.
///
/// Income entries are laid out before expense entries and the sort is
/// stable, so an income and an expense sharing a timestamp keep that order.
pub fn merge_transactions(income: &[IncomeRecord], expenses: &[ExpenseRecord]) -> Vec<Transaction> {
    let mut all: Vec<Transaction> = Vec::with_capacity(income.len() + expenses.len());

    all.extend(income.iter().map(|entry| Transaction {
        id: entry.id,
        kind: TransactionKind::Income,
        amount: entry.amount,
        occurred_at: entry.created_at,
        description: format!("Income from {}", entry.project_name),
        remarks: entry.remarks.clone(),
        category: None,
    }));

    all.extend(expenses.iter().map(|entry| Transaction {
        id: entry.id,
        kind: TransactionKind::Expense,
        amount: entry.amount.unwrap_or(Decimal::ZERO),
        occurred_at: entry.created_at,
        description: format!("Expense for {}", entry.project_name),
        remarks: entry.remarks.clone(),
        category: Some(entry.category_name.clone()),
    }));

    all.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    all
}

/// One row of the expense breakdown, in ranking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percentage: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_balance: Decimal,
    pub expense_by_category: BTreeMap<String, Decimal>,
    /// Share of `total_expense` per category. Empty when there are no expenses.
    pub expense_percentages: BTreeMap<String, u8>,
    /// Categories by total descending, ties by name.
    pub ranking: Vec<String>,
}

impl FinancialSummary {
    /// Ranked breakdown rows joining totals and percentages.
    pub fn breakdown(&self) -> Vec<CategoryShare> {
        self.ranking
            .iter()
            .map(|category| CategoryShare {
                category: category.clone(),
                amount: self
                    .expense_by_category
                    .get(category)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
                percentage: self.expense_percentages.get(category).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Final quotation minus the income received so far. Negative once the
    /// client has paid more than quoted.
    pub fn remaining_from_quote(&self, project: &Project) -> Decimal {
        project.final_quotation - self.total_income
    }

    /// The `n` largest expense categories.
    pub fn cost_reduction_candidates(&self, n: usize) -> &[String] {
        &self.ranking[..n.min(self.ranking.len())]
    }
}

fn accumulate(total: &mut Decimal, amount: Decimal, what: &str) -> SiteResult<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| SiteError::AmountOverflow(what.to_string()))?;
    Ok(())
}

/// Totals, per-category sums, percentages and ranking of a timeline.
/// Fails with `AmountOverflow` when a sum leaves the `Decimal` range.
pub fn summarize(transactions: &[Transaction]) -> SiteResult<FinancialSummary> {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut expense_by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    for t in transactions {
        match t.kind {
            TransactionKind::Income => accumulate(&mut total_income, t.amount, "total income")?,
            TransactionKind::Expense => {
                accumulate(&mut total_expense, t.amount, "total expense")?;
                if let Some(category) = &t.category {
                    let sum = expense_by_category
                        .entry(category.clone())
                        .or_insert(Decimal::ZERO);
                    accumulate(sum, t.amount, category)?;
                }
            }
        }
    }

    let expense_percentages = expense_by_category
        .iter()
        .map(|(category, amount)| (category.clone(), percent_of(*amount, total_expense)))
        .collect();

    let mut ranked: Vec<(&String, &Decimal)> = expense_by_category.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let ranking = ranked.into_iter().map(|(name, _)| name.clone()).collect();

    Ok(FinancialSummary {
        total_income,
        total_expense,
        // both sides are non-negative, so the difference stays in range
        net_balance: total_income - total_expense,
        expense_by_category,
        expense_percentages,
        ranking,
    })
}

/// Percentage of the final quotation received as income, within [0, 100].
/// A project quoted at zero reports 0.
pub fn compute_progress(project: &Project, total_income_received: Decimal) -> u8 {
    percent_of(total_income_received, project.final_quotation)
}

/// round(100 * part / whole) clamped to [0, 100]; zero when `whole` is zero.
fn percent_of(part: Decimal, whole: Decimal) -> u8 {
    if whole.is_zero() || part.is_sign_negative() {
        return 0;
    }
    if part >= whole {
        return 100;
    }
    // part < whole here, so the ratio is below one and the product below 100
    let Some(pct) = part
        .checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    else {
        return 0;
    };
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(TransactionKind),
}

/// Timeline filter. The category only narrows expense rows, so income stays
/// visible under `KindFilter::All` with a category selected.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: KindFilter,
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if let KindFilter::Only(kind) = self.kind {
            if t.kind != kind {
                return false;
            }
        }
        if t.kind == TransactionKind::Expense {
            if let Some(wanted) = &self.category {
                if t.category.as_deref() != Some(wanted.as_str()) {
                    return false;
                }
            }
        }
        true
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Distinct expense categories in first-seen order.
pub fn expense_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for t in transactions {
        if let Some(category) = &t.category {
            if !seen.iter().any(|c| c == category) {
                seen.push(category.clone());
            }
        }
    }
    seen
}

/// Headline figures for a project card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectOverview {
    pub project: Project,
    pub amount_received: Decimal,
    pub expenses: Decimal,
    pub profit_or_loss: Decimal,
    pub progress: u8,
}

impl ProjectOverview {
    pub fn new(project: Project, summary: &FinancialSummary) -> Self {
        let progress = compute_progress(&project, summary.total_income);
        ProjectOverview {
            amount_received: summary.total_income,
            expenses: summary.total_expense,
            profit_or_loss: summary.net_balance,
            progress,
            project,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.profit_or_loss >= Decimal::ZERO
    }
}
