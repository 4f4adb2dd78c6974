//! Budget setting entity - A single row holding the daily and weekly budget.
//! The row always uses id [`crate::models::BUDGET_SETTING_ID`] and is replaced on save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget setting database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_settings")]
pub struct Model {
    /// Fixed key of the singleton row
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Budget per day
    pub daily_budget: i64,
    /// Budget per week
    pub weekly_budget: i64,
    /// When the setting was last saved
    pub updated_at: DateTime,
}

/// `BudgetSetting` has no relationships with other entities
/// The budget setting has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
