//! Budget setting persistence logic.
//!
//! The setting is a single row with a fixed key. Saving replaces it on conflict, so there is
//! never more than one row.

use crate::{
    core::validation::ensure_non_negative,
    entities::{BudgetSettingEntity, budget_setting},
    errors::Result,
    models::{BUDGET_SETTING_ID, BudgetSetting},
};
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use tracing::debug;

/// Reads the stored budget setting, if one has been saved.
pub async fn get_budget_setting(db: &DatabaseConnection) -> Result<Option<BudgetSetting>> {
    let row = BudgetSettingEntity::find_by_id(BUDGET_SETTING_ID)
        .one(db)
        .await?;
    Ok(row.map(BudgetSetting::from))
}

/// Inserts the budget setting, replacing the existing row on conflict.
///
/// # Errors
/// Returns an error if either budget is negative or the write fails.
pub async fn upsert_budget_setting(
    db: &DatabaseConnection,
    setting: BudgetSetting,
) -> Result<BudgetSetting> {
    ensure_non_negative(setting.daily_budget)?;
    ensure_non_negative(setting.weekly_budget)?;

    let row = budget_setting::ActiveModel {
        id: Set(BUDGET_SETTING_ID),
        daily_budget: Set(setting.daily_budget),
        weekly_budget: Set(setting.weekly_budget),
        updated_at: Set(chrono::Utc::now().naive_utc()),
    };

    BudgetSettingEntity::insert(row)
        .on_conflict(
            OnConflict::column(budget_setting::Column::Id)
                .update_columns([
                    budget_setting::Column::DailyBudget,
                    budget_setting::Column::WeeklyBudget,
                    budget_setting::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;

    debug!(
        "Budget setting saved: daily={} weekly={}",
        setting.daily_budget, setting.weekly_budget
    );
    Ok(setting)
}
