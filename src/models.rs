//! Domain records shared by the store and the aggregators.
//!
//! These are the plain values carried inside snapshots. They are converted from the `SeaORM`
//! entity models in [`crate::entities`] and never hold a database handle.

use crate::entities::{budget_setting, expense, wishlist_item};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed primary key of the singleton budget setting row.
pub const BUDGET_SETTING_ID: i32 = 1;

/// Category a wishlist item belongs to.
///
/// Stored as a stable text code. Codes this build does not know read back as [`ItemCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Gadgets and devices
    Electronics,
    /// Clothing and accessories
    Fashion,
    /// Skincare and cosmetics
    Skincare,
    /// Toys and games
    Toys,
    /// Food and drink
    Food,
    /// Anything else
    Other,
}

impl ItemCategory {
    /// Every category, in picker order.
    pub const ALL: [Self; 6] = [
        Self::Electronics,
        Self::Fashion,
        Self::Skincare,
        Self::Toys,
        Self::Food,
        Self::Other,
    ];

    /// Text code written to the `category` column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Electronics => "ELECTRONICS",
            Self::Fashion => "FASHION",
            Self::Skincare => "SKINCARE",
            Self::Toys => "TOYS",
            Self::Food => "FOOD",
            Self::Other => "OTHER",
        }
    }

    /// Reads a stored code back, degrading unknown codes to `Other`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(code.trim()))
            .unwrap_or_else(|| {
                warn!("Unknown item category code {:?}, treating as OTHER", code);
                Self::Other
            })
    }
}

/// A wishlist item as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    /// Store-assigned identifier
    pub id: i64,
    /// Display name, never blank
    pub name: String,
    /// Price to save towards, in the smallest currency unit
    pub target_price: i64,
    /// Category used for filtering
    pub category: ItemCategory,
    /// Amount saved so far
    pub saved_amount: i64,
    /// Set by the user; independent of `saved_amount` reaching `target_price`
    pub is_purchased: bool,
}

impl WishlistItem {
    /// Saved fraction of the target, clamped to `[0, 1]`. Zero when the target is zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.target_price <= 0 {
            return 0.0;
        }
        (self.saved_amount as f64 / self.target_price as f64).clamp(0.0, 1.0)
    }

    /// Amount still missing. Negative when over-saved.
    #[must_use]
    pub const fn remaining(&self) -> i64 {
        self.target_price.saturating_sub(self.saved_amount)
    }
}

impl From<wishlist_item::Model> for WishlistItem {
    fn from(model: wishlist_item::Model) -> Self {
        Self {
            id: model.id,
            category: ItemCategory::from_code(&model.category),
            name: model.name,
            target_price: model.target_price,
            saved_amount: model.saved_amount,
            is_purchased: model.is_purchased,
        }
    }
}

/// Fields needed to create a wishlist item. Saved amount starts at 0, purchase flag at false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWishlistItem {
    /// Display name
    pub name: String,
    /// Target price
    pub target_price: i64,
    /// Category
    pub category: ItemCategory,
}

/// A single expense in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identifier
    pub id: i64,
    /// What the money was spent on
    pub name: String,
    /// Amount spent
    pub amount: i64,
}

impl From<expense::Model> for Expense {
    fn from(model: expense::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
        }
    }
}

/// Fields needed to record an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// What the money was spent on
    pub name: String,
    /// Amount spent
    pub amount: i64,
}

/// The singleton budget setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSetting {
    /// Budget per day
    pub daily_budget: i64,
    /// Budget per week; written as `daily_budget * 7` on save but stored independently
    pub weekly_budget: i64,
}

impl From<budget_setting::Model> for BudgetSetting {
    fn from(model: budget_setting::Model) -> Self {
        Self {
            daily_budget: model.daily_budget,
            weekly_budget: model.weekly_budget,
        }
    }
}
