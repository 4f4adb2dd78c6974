//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases,
//! spawning a store over them and creating fixtures with sensible defaults.

use crate::{
    config::database::create_tables,
    core::{expense, wishlist},
    errors::Result,
    models::{Expense, ItemCategory, NewExpense, NewWishlistItem, WishlistItem},
    store::{StoreHandle, spawn_store},
};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Spawns a store worker over a fresh in-memory database.
pub async fn setup_test_store() -> Result<(StoreHandle, JoinHandle<()>)> {
    let db = setup_test_db().await?;
    spawn_store(db).await
}

/// Inserts a wishlist item directly, bypassing the store.
pub async fn create_test_item(
    db: &DatabaseConnection,
    name: &str,
    target_price: i64,
    category: ItemCategory,
) -> Result<WishlistItem> {
    wishlist::create_item(
        db,
        NewWishlistItem {
            name: name.to_string(),
            target_price,
            category,
        },
    )
    .await
}

/// Inserts an expense directly, bypassing the store.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    name: &str,
    amount: i64,
) -> Result<Expense> {
    expense::create_expense(
        db,
        NewExpense {
            name: name.to_string(),
            amount,
        },
    )
    .await
}
