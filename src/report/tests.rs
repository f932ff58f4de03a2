#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::store::Store;

fn seeded_store() -> Store {
    let store = Store::open_in_memory().unwrap();
    store
        .insert_expense_at(dec!(75.00), Category::Food, "groceries", "2024-01-05 09:15:00")
        .unwrap();
    store
        .insert_expense_at(dec!(25.00), Category::Utilities, "power", "2024-01-20 18:00:00")
        .unwrap();
    store
        .insert_expense_at(dec!(40.00), Category::Food, "dinner", "2024-02-02 20:10:00")
        .unwrap();
    store
}

// ── Monthly report ────────────────────────────────────────────

#[test]
fn test_monthly_report_empty_month() {
    let store = Store::open_in_memory().unwrap();
    assert!(monthly_report(&store, "2024-01").unwrap().is_none());
}

#[test]
fn test_monthly_report_totals() {
    let store = seeded_store();
    let report = monthly_report(&store, "2024-01").unwrap().unwrap();

    assert_eq!(report.month, "2024-01");
    assert_eq!(report.total, dec!(100.00));
    assert_eq!(report.expenses.len(), 2);
    // Date ascending
    assert_eq!(report.expenses[0].description, "groceries");
    assert_eq!(report.expenses[1].description, "power");
}

#[test]
fn test_monthly_report_breakdown() {
    let store = seeded_store();
    let report = monthly_report(&store, "2024-01").unwrap().unwrap();

    // Largest spend first
    assert_eq!(report.by_category.len(), 2);
    assert_eq!(report.by_category[0].category, Category::Food);
    assert_eq!(report.by_category[0].total, dec!(75.00));
    assert_eq!(report.by_category[0].percentage, dec!(75));
    assert_eq!(report.by_category[1].category, Category::Utilities);
    assert_eq!(report.by_category[1].percentage, dec!(25));

    let pct_sum: Decimal = report.by_category.iter().map(|l| l.percentage).sum();
    assert_eq!(pct_sum, dec!(100));
}

#[test]
fn test_monthly_report_scoped_to_month() {
    let store = seeded_store();
    let report = monthly_report(&store, "2024-02").unwrap().unwrap();

    assert_eq!(report.total, dec!(40.00));
    assert_eq!(report.expenses.len(), 1);
    assert!(report
        .by_category
        .iter()
        .all(|l| l.category == Category::Food));
}

// ── Text rendering ────────────────────────────────────────────

#[test]
fn test_write_monthly_report() {
    let store = seeded_store();
    let report = monthly_report(&store, "2024-01").unwrap().unwrap();

    let mut out = Vec::new();
    write_monthly_report(&mut out, &report).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Expense Report for January 2024"));
    assert!(text.contains("Total Expenses: $100.00"));
    assert!(text.contains("Food: $75.00 (75.0%)"));
    assert!(text.contains("Utilities: $25.00 (25.0%)"));
    assert!(text.contains("2024-01-05 - Food - $75.00 - groceries"));
}

// ── Spending trend ────────────────────────────────────────────

#[test]
fn test_spending_trend_empty() {
    let store = Store::open_in_memory().unwrap();
    assert!(spending_trend(&store).unwrap().is_empty());
}

#[test]
fn test_spending_trend_accumulates() {
    let store = seeded_store();
    let trend = spending_trend(&store).unwrap();

    assert_eq!(trend.len(), 3);
    assert_eq!(trend[0].running_total, dec!(75.00));
    assert_eq!(trend[1].running_total, dec!(100.00));
    assert_eq!(trend[2].running_total, dec!(140.00));
    // Date ascending
    for window in trend.windows(2) {
        assert!(window[0].date <= window[1].date);
    }
}
