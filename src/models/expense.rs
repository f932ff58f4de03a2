use rust_decimal::Decimal;

use super::Category;

/// One recorded spend event. The date is assigned by the store at insert
/// time ("%Y-%m-%d %H:%M:%S", local); rows are never updated in place.
#[derive(Debug, Clone)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    pub date: String,
}

impl Expense {
    /// The "YYYY-MM" prefix of the expense date.
    pub fn month(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }
}
