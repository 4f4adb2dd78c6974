//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity models with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust struct definitions without hand-written SQL.

use crate::entities::{BudgetSettingEntity, ExpenseEntity, WishlistItemEntity};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Connection string used when neither the environment nor the config file names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://wishlist_buddy.sqlite?mode=rwc";

/// Resolves the database URL.
///
/// `DATABASE_URL` from the environment wins, then the value from the config file,
/// then [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn resolve_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Uses `IF NOT EXISTS`, so calling this against an existing database is a no-op.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut wishlist_table = schema.create_table_from_entity(WishlistItemEntity);
    let mut expense_table = schema.create_table_from_entity(ExpenseEntity);
    let mut budget_table = schema.create_table_from_entity(BudgetSettingEntity);

    wishlist_table.if_not_exists();
    expense_table.if_not_exists();
    budget_table.if_not_exists();

    db.execute(builder.build(&wishlist_table)).await?;
    db.execute(builder.build(&expense_table)).await?;
    db.execute(builder.build(&budget_table)).await?;

    info!("Database tables are ready");
    Ok(())
}
