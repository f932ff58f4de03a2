//! Aggregate reporting over the store: a monthly breakdown with a plain
//! text rendering, and the cumulative spending series. Chart drawing is a
//! consumer concern; this module only prepares the numbers.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;

use crate::models::{Category, Expense};
use crate::store::Store;

/// One category's share of a month.
#[derive(Debug, Clone)]
pub struct CategoryLine {
    pub category: Category,
    pub total: Decimal,
    /// Share of the month total, 0-100.
    pub percentage: Decimal,
}

/// Everything the monthly report shows: the total, the per-category
/// breakdown largest-first, and the individual expenses date ascending.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    /// Format: "YYYY-MM"
    pub month: String,
    pub total: Decimal,
    pub by_category: Vec<CategoryLine>,
    pub expenses: Vec<Expense>,
}

/// A point on the cumulative spending curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: String,
    pub running_total: Decimal,
}

/// Builds the report for one "YYYY-MM" month, or `None` when that month
/// has no expenses.
pub fn monthly_report(store: &Store, month: &str) -> Result<Option<MonthlyReport>> {
    let expenses = store.get_expenses_for_month(month)?;
    if expenses.is_empty() {
        return Ok(None);
    }

    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    let by_category = store
        .get_category_totals_for_month(month)?
        .into_iter()
        .map(|(category, cat_total)| CategoryLine {
            category,
            total: cat_total,
            percentage: if total.is_zero() {
                Decimal::ZERO
            } else {
                cat_total / total * Decimal::ONE_HUNDRED
            },
        })
        .collect();

    Ok(Some(MonthlyReport {
        month: month.to_string(),
        total,
        by_category,
        expenses,
    }))
}

/// Cumulative spend over every expense in date order.
pub fn spending_trend(store: &Store) -> Result<Vec<TrendPoint>> {
    let mut expenses = store.get_expenses(None)?;
    expenses.sort_by(|a, b| a.date.cmp(&b.date));

    let mut running = Decimal::ZERO;
    Ok(expenses
        .into_iter()
        .map(|e| {
            running += e.amount;
            TrendPoint {
                date: e.date,
                running_total: running,
            }
        })
        .collect())
}

/// Renders the report as plain text, the shape a terminal or a mail body
/// wants.
pub fn write_monthly_report<W: Write>(w: &mut W, report: &MonthlyReport) -> Result<()> {
    writeln!(w, "Expense Report for {}", month_label(&report.month))?;
    writeln!(w, "{}", "=".repeat(40))?;
    writeln!(w, "Total Expenses: ${:.2}", report.total)?;
    writeln!(w)?;
    writeln!(w, "Breakdown by Category:")?;
    for line in &report.by_category {
        writeln!(
            w,
            "{}: ${:.2} ({:.1}%)",
            line.category, line.total, line.percentage
        )?;
    }
    writeln!(w)?;
    writeln!(w, "Detailed Expenses:")?;
    for expense in &report.expenses {
        let day = expense.date.get(..10).unwrap_or(&expense.date);
        writeln!(
            w,
            "{} - {} - ${:.2} - {}",
            day, expense.category, expense.amount, expense.description
        )?;
    }
    Ok(())
}

/// "2024-03" -> "March 2024"; months that fail to parse are shown as-is.
fn month_label(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|_| month.to_string())
}

#[cfg(test)]
mod tests;
