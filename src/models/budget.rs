use rust_decimal::Decimal;

use super::Category;

/// A spending limit for one category over a period label ("monthly").
/// The store keeps at most one row per (category, period).
#[derive(Debug, Clone)]
pub struct Budget {
    pub id: Option<i64>,
    pub category: Category,
    pub amount: Decimal,
    pub period: String,
    /// Format: "YYYY-MM-DD", the day the limit was (re)set.
    pub start_date: String,
}

/// Where spending stands against a category's limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetStatus {
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
}

impl BudgetStatus {
    /// With no limit set, remaining and percentage are pinned to zero
    /// rather than dividing by zero. Percentage exceeds 100 when
    /// overspent; callers branch on `remaining < 0` for alerts.
    pub fn compute(budget: Decimal, spent: Decimal) -> Self {
        if budget.is_zero() {
            return Self {
                budget: Decimal::ZERO,
                spent,
                remaining: Decimal::ZERO,
                percentage: Decimal::ZERO,
            };
        }
        Self {
            budget,
            spent,
            remaining: budget - spent,
            percentage: spent / budget * Decimal::ONE_HUNDRED,
        }
    }

    pub fn is_over(&self) -> bool {
        self.budget > Decimal::ZERO && self.remaining < Decimal::ZERO
    }
}
