//! Budget aggregator - spend totals and remaining budget over the expense ledger.
//!
//! The daily budget is edited as raw text and only persisted on an explicit save. Saving
//! always writes `weekly = daily * 7`. Reads, however, prefer whatever weekly value is stored.

use crate::{
    core::validation::{invalid_amount, parse_amount, require_name},
    errors::{Error, Result},
    models::{BudgetSetting, Expense, NewExpense},
    store::{Snapshot, StoreHandle},
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Days in a budget week.
pub const DAYS_PER_WEEK: i64 = 7;

/// Derived budget figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSummary {
    /// Stored daily budget, else the parsed input, else 0
    pub daily_budget: i64,
    /// Stored weekly budget, else `daily_budget * 7`
    pub weekly_budget: i64,
    /// Sum of all expense amounts
    pub spent_total: i64,
    /// `weekly_budget - spent_total`, never below 0
    pub remaining: i64,
    /// `spent_total / weekly_budget`; not clamped, so above 1.0 means over budget
    pub progress: f64,
}

/// Computes the budget summary from the stored setting, the unsaved input and the ledger.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(
    setting: Option<&BudgetSetting>,
    daily_budget_input: &str,
    expenses: &[Expense],
) -> BudgetSummary {
    let daily_budget = setting
        .map(|s| s.daily_budget)
        .or_else(|| parse_amount(daily_budget_input).ok())
        .unwrap_or(0);
    let weekly_budget = setting.map_or_else(
        || daily_budget.saturating_mul(DAYS_PER_WEEK),
        |s| s.weekly_budget,
    );
    let spent_total = expenses
        .iter()
        .fold(0_i64, |acc, expense| acc.saturating_add(expense.amount));
    let remaining = weekly_budget.saturating_sub(spent_total).max(0);
    let progress = if weekly_budget > 0 {
        spent_total as f64 / weekly_budget as f64
    } else {
        0.0
    };

    BudgetSummary {
        daily_budget,
        weekly_budget,
        spent_total,
        remaining,
        progress,
    }
}

/// Derived view over the budget setting and expense ledger.
#[derive(Debug)]
pub struct BudgetAggregator {
    store: StoreHandle,
    setting: watch::Receiver<Option<BudgetSetting>>,
    expenses: watch::Receiver<Snapshot<Expense>>,
    daily_budget_input: String,
}

impl BudgetAggregator {
    /// Subscribes to the store's budget and expense snapshots.
    ///
    /// The daily-budget input starts out holding the stored daily budget, if any.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        let setting = store.subscribe_budget();
        let expenses = store.subscribe_expenses();
        let mut aggregator = Self {
            store,
            setting,
            expenses,
            daily_budget_input: String::new(),
        };
        aggregator.prefill_input();
        aggregator
    }

    /// Replaces the unsaved daily-budget text. Nothing is persisted.
    pub fn set_daily_budget_input(&mut self, text: impl Into<String>) {
        self.daily_budget_input = text.into();
    }

    /// The unsaved daily-budget text.
    #[must_use]
    pub fn daily_budget_input(&self) -> &str {
        &self.daily_budget_input
    }

    /// Whether [`Self::save_daily_budget`] would be accepted.
    #[must_use]
    pub fn can_save(&self) -> bool {
        parse_amount(&self.daily_budget_input).is_ok()
    }

    /// Parses the input and requests an upsert of `{daily, daily * 7}`.
    ///
    /// Returns the setting that was requested.
    ///
    /// # Errors
    /// `InvalidAmount` if the input is not a non-negative whole number or the weekly
    /// amount would overflow. Nothing is sent in that case.
    pub fn save_daily_budget(&self) -> Result<BudgetSetting> {
        let daily_budget = parse_amount(&self.daily_budget_input)?;
        let weekly_budget = daily_budget
            .checked_mul(DAYS_PER_WEEK)
            .ok_or_else(|| invalid_amount(&self.daily_budget_input))?;

        let setting = BudgetSetting {
            daily_budget,
            weekly_budget,
        };
        debug!("Requesting budget save: {:?}", setting);
        self.store.upsert_budget(setting)?;
        Ok(setting)
    }

    /// Validates the input and requests a new expense.
    ///
    /// # Errors
    /// `BlankName` or `InvalidAmount` when the input is rejected; nothing is sent to the store.
    pub fn add_expense(&self, name: &str, amount: &str) -> Result<()> {
        let name = require_name("expense name", name)?;
        let amount = parse_amount(amount)?;
        self.store.insert_expense(NewExpense { name, amount })
    }

    /// Requests the expense be deleted.
    ///
    /// # Errors
    /// `ExpenseNotFound` if the expense is not in the current ledger snapshot.
    pub fn delete_expense(&self, expense_id: i64) -> Result<()> {
        if !self.expenses.borrow().iter().any(|e| e.id == expense_id) {
            return Err(Error::ExpenseNotFound { id: expense_id });
        }
        self.store.delete_expense(expense_id)
    }

    /// The latest expense ledger, most recent first.
    #[must_use]
    pub fn expenses(&self) -> Snapshot<Expense> {
        Arc::clone(&self.expenses.borrow())
    }

    /// The latest stored setting, if one has been saved.
    #[must_use]
    pub fn setting(&self) -> Option<BudgetSetting> {
        *self.setting.borrow()
    }

    /// Current budget figures.
    #[must_use]
    pub fn summary(&self) -> BudgetSummary {
        let setting = *self.setting.borrow();
        summarize(
            setting.as_ref(),
            &self.daily_budget_input,
            &self.expenses.borrow(),
        )
    }

    /// Waits until the setting or the ledger changes, then refreshes the input pre-fill.
    ///
    /// # Errors
    /// `StoreClosed` once the store worker has stopped.
    pub async fn changed(&mut self) -> Result<()> {
        let result = tokio::select! {
            r = self.setting.changed() => r,
            r = self.expenses.changed() => r,
        };
        result.map_err(|_| Error::StoreClosed)?;
        self.prefill_input();
        Ok(())
    }

    fn prefill_input(&mut self) {
        if !self.daily_budget_input.trim().is_empty() {
            return;
        }
        let stored = *self.setting.borrow();
        if let Some(setting) = stored {
            self.daily_budget_input = setting.daily_budget.to_string();
        }
    }
}
