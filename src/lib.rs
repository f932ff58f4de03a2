//! Local-only personal expense ledger backed by a single SQLite file:
//! categorized expenses, per-category budgets, and aggregate reporting.
//! Front ends sit on top of [`Store`] and never touch the database
//! directly.

mod models;
pub mod report;
mod store;

pub use models::{Budget, BudgetStatus, Category, Expense};
pub use store::Store;

use anyhow::{Context, Result};

/// The per-user database location, created on demand.
pub fn default_db_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendtrack", "SpendTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendtrack.db"))
}
