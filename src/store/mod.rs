mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::models::*;

/// The ledger store: owns the persistent record of expenses, categories,
/// and budgets. One connection per store; every operation is a single
/// synchronous unit of work.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the database file, runs the idempotent schema
    /// migration, and seeds the fixed categories. This is the one
    /// process-start initialization step; construct the store once and
    /// hand it to whatever needs it.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut store = Self { conn };
        store.migrate().context("Database migration failed")?;
        store.seed_categories()?;
        debug!("opened expense store at {}", path.display());
        Ok(store)
    }

    /// An isolated in-memory store. Nothing persists past the value; handy
    /// for tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut store = Self { conn };
        store.migrate()?;
        store.seed_categories()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            debug!("applied fresh schema v{}", schema::CURRENT_VERSION);
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            debug!(
                "migrated schema v{} -> v{}",
                current,
                schema::CURRENT_VERSION
            );
        }

        Ok(())
    }

    /// Inserts the fixed category names, insert-if-absent. Safe to run on
    /// every open.
    fn seed_categories(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for category in Category::all() {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
                params![category.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Records a spend event dated now. Returns `Ok(false)` without
    /// writing when the category is not one of the fixed names or the
    /// amount is negative; parsing the amount string is the caller's job.
    pub fn add_expense(&self, amount: Decimal, category: &str, description: &str) -> Result<bool> {
        let Some(category) = Category::parse(category) else {
            warn!("rejected expense with unknown category {category:?}");
            return Ok(false);
        };
        if amount < Decimal::ZERO {
            warn!("rejected expense with negative amount {amount}");
            return Ok(false);
        }
        let date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.insert_expense_at(amount, category, description, &date)?;
        Ok(true)
    }

    pub(crate) fn insert_expense_at(
        &self,
        amount: Decimal,
        category: Category,
        description: &str,
        date: &str,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (amount, category, description, date) VALUES (?1, ?2, ?3, ?4)",
            params![amount.to_string(), category.as_str(), description, date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Deletes by id. `Ok(false)` means no such row, which is not an
    /// error.
    pub fn remove_expense(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if removed == 0 {
            debug!("remove_expense: id {id} not found");
        }
        Ok(removed > 0)
    }

    /// All expenses in insertion order, or only one category's when a
    /// filter is given. `Some("All")` means no filter; a name outside the
    /// fixed set simply matches nothing.
    pub fn get_expenses(&self, category: Option<&str>) -> Result<Vec<Expense>> {
        match category {
            Some(cat) if cat != "All" => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, amount, category, description, date FROM expenses
                     WHERE category = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![canonical_name(cat)], row_to_expense)?;
                Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
            }
            _ => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, amount, category, description, date FROM expenses ORDER BY id",
                )?;
                let rows = stmt.query_map([], row_to_expense)?;
                Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
            }
        }
    }

    pub fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    /// One month's expenses ("YYYY-MM"), date ascending.
    pub fn get_expenses_for_month(&self, month: &str) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, category, description, date FROM expenses
             WHERE date LIKE ?1 ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![format!("{month}%")], row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Totals ────────────────────────────────────────────────

    /// Sum of matching amounts; zero when nothing matches. Same filter
    /// semantics as [`Store::get_expenses`].
    pub fn get_total(&self, category: Option<&str>) -> Result<Decimal> {
        let total: String = match category {
            Some(cat) if cat != "All" => self.conn.query_row(
                "SELECT CAST(COALESCE(SUM(amount), 0) AS TEXT) FROM expenses WHERE category = ?1",
                params![canonical_name(cat)],
                |row| row.get(0),
            )?,
            _ => self.conn.query_row(
                "SELECT CAST(COALESCE(SUM(amount), 0) AS TEXT) FROM expenses",
                [],
                |row| row.get(0),
            )?,
        };
        Ok(Decimal::from_str(&total).unwrap_or_default())
    }

    /// Total per fixed category, in declaration order, zero for the unused
    /// ones.
    pub fn get_category_totals(&self) -> Result<Vec<(Category, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, CAST(SUM(amount) AS TEXT) FROM expenses GROUP BY category",
        )?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let total: String = row.get(1)?;
            Ok((name, Decimal::from_str(&total).unwrap_or_default()))
        })?;
        let mut by_name: HashMap<String, Decimal> = HashMap::new();
        for row in rows {
            let (name, total) = row?;
            by_name.insert(name, total);
        }
        Ok(Category::all()
            .iter()
            .map(|c| (*c, by_name.get(c.as_str()).copied().unwrap_or_default()))
            .collect())
    }

    /// Total per calendar month, chronological, only months that have at
    /// least one expense.
    pub fn get_monthly_totals(&self) -> Result<Vec<(String, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT strftime('%Y-%m', date) AS month, CAST(SUM(amount) AS TEXT)
             FROM expenses
             GROUP BY month
             ORDER BY month",
        )?;
        let rows = stmt.query_map([], |row| {
            let month: String = row.get(0)?;
            let total: String = row.get(1)?;
            Ok((month, Decimal::from_str(&total).unwrap_or_default()))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// One month's spend per category, largest first. Categories without
    /// spend that month are omitted.
    pub fn get_category_totals_for_month(&self, month: &str) -> Result<Vec<(Category, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, CAST(SUM(amount) AS TEXT) FROM expenses
             WHERE date LIKE ?1
             GROUP BY category
             ORDER BY SUM(amount) DESC",
        )?;
        let rows = stmt.query_map(params![format!("{month}%")], |row| {
            let name: String = row.get(0)?;
            let total: String = row.get(1)?;
            Ok((
                Category::parse(&name).unwrap_or(Category::Other),
                Decimal::from_str(&total).unwrap_or_default(),
            ))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Distinct categories that appear in at least one expense, name
    /// order.
    pub fn categories_in_use(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM expenses ORDER BY category")?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            Ok(Category::parse(&name).unwrap_or(Category::Other))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Sets the limit for (category, period), replacing any previous one
    /// and stamping today as the start date. `Ok(false)` on a category
    /// outside the fixed set or a negative amount, with nothing written.
    pub fn set_budget(&self, category: &str, amount: Decimal, period: &str) -> Result<bool> {
        let Some(category) = Category::parse(category) else {
            warn!("rejected budget with unknown category {category:?}");
            return Ok(false);
        };
        if amount < Decimal::ZERO {
            warn!("rejected budget with negative amount {amount}");
            return Ok(false);
        }
        let start_date = chrono::Local::now().format("%Y-%m-%d").to_string();
        self.conn.execute(
            "INSERT INTO budgets (category, amount, period, start_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(category, period) DO UPDATE SET amount = ?2, start_date = ?4",
            params![category.as_str(), amount.to_string(), period, start_date],
        )?;
        Ok(true)
    }

    /// The limit for (category, period); zero when none is set.
    pub fn get_budget(&self, category: &str, period: &str) -> Result<Decimal> {
        let result = self.conn.query_row(
            "SELECT amount FROM budgets WHERE category = ?1 AND period = ?2",
            params![canonical_name(category), period],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(amount) => Ok(Decimal::from_str(&amount).unwrap_or_default()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Decimal::ZERO),
            Err(e) => Err(e.into()),
        }
    }

    /// Every budget row for a period, category name order.
    pub fn get_budgets(&self, period: &str) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, amount, period, start_date FROM budgets
             WHERE period = ?1 ORDER BY category",
        )?;
        let rows = stmt.query_map(params![period], |row| {
            let name: String = row.get(1)?;
            let amount: String = row.get(2)?;
            Ok(Budget {
                id: Some(row.get(0)?),
                category: Category::parse(&name).unwrap_or(Category::Other),
                amount: Decimal::from_str(&amount).unwrap_or_default(),
                period: row.get(3)?,
                start_date: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Spending position against the (category, period) limit. Spent is
    /// the category's all-time total; an unknown category name reads as no
    /// budget and no spend.
    pub fn get_budget_status(&self, category: &str, period: &str) -> Result<BudgetStatus> {
        let budget = self.get_budget(category, period)?;
        let spent = self.get_total(Some(category))?;
        Ok(BudgetStatus::compute(budget, spent))
    }

    /// Status for every category in the fixed set, declaration order.
    pub fn get_all_budget_statuses(&self, period: &str) -> Result<Vec<(Category, BudgetStatus)>> {
        Category::all()
            .iter()
            .map(|c| Ok((*c, self.get_budget_status(c.as_str(), period)?)))
            .collect()
    }
}

/// Folds any spelling of a fixed category onto its stored name; names
/// outside the set pass through and match nothing.
fn canonical_name(cat: &str) -> &str {
    Category::parse(cat).map(|c| c.as_str()).unwrap_or(cat)
}

fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    let amount: String = row.get(1)?;
    let category: String = row.get(2)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        amount: Decimal::from_str(&amount).unwrap_or_default(),
        category: Category::parse(&category).unwrap_or(Category::Other),
        description: row.get(3)?,
        date: row.get(4)?,
    })
}
