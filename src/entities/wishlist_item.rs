//! Wishlist item entity - Something the user is saving up for.
//!
//! Each row tracks a target price, the amount saved so far and a purchase flag
//! the user toggles by hand. Progress is derived at read time and never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wishlist item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wishlist_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Headphones")
    pub name: String,
    /// Target price in the smallest currency unit
    pub target_price: i64,
    /// Category code (e.g., `"ELECTRONICS"`); unknown codes read back as `OTHER`
    pub category: String,
    /// Amount saved towards the target
    pub saved_amount: i64,
    /// Whether the user marked the item as bought
    pub is_purchased: bool,
    /// When the item was created
    pub created_at: DateTime,
    /// When the item was last modified
    pub updated_at: DateTime,
}

/// Wishlist items have no relationships with other entities
/// Wishlist items have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
