//! Expense ledger persistence logic.
//!
//! Expenses are append-and-delete only: there is no update path.

use crate::{
    core::validation::{ensure_non_negative, require_name},
    entities::{ExpenseEntity, expense},
    errors::Result,
    models::{Expense, NewExpense},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves the whole ledger, most recently recorded first.
pub async fn get_all_expenses(db: &DatabaseConnection) -> Result<Vec<Expense>> {
    let rows = ExpenseEntity::find()
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Expense::from).collect())
}

/// Records a new expense.
///
/// # Errors
/// Returns an error if the name is blank, the amount is negative, or the insert fails.
pub async fn create_expense(db: &DatabaseConnection, new_expense: NewExpense) -> Result<Expense> {
    let name = require_name("expense name", &new_expense.name)?;
    let amount = ensure_non_negative(new_expense.amount)?;

    let row = expense::ActiveModel {
        name: Set(name),
        amount: Set(amount),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    Ok(row.insert(db).await?.into())
}

/// Deletes an expense by id and returns the number of rows removed (0 if it was already gone).
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<u64> {
    let result = ExpenseEntity::delete_by_id(expense_id).exec(db).await?;
    Ok(result.rows_affected)
}
