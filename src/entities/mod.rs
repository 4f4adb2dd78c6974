//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables. Each entity has a Model struct
//! for data and an Entity struct for operations.

pub mod budget_setting;
pub mod expense;
pub mod wishlist_item;

// Re-export specific types to avoid conflicts
pub use budget_setting::{
    Column as BudgetSettingColumn, Entity as BudgetSettingEntity, Model as BudgetSettingModel,
};
pub use expense::{Column as ExpenseColumn, Entity as ExpenseEntity, Model as ExpenseModel};
pub use wishlist_item::{
    Column as WishlistItemColumn, Entity as WishlistItemEntity, Model as WishlistItemModel,
};
