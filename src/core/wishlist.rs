//! Wishlist persistence logic - Handles all wishlist item operations against the database.
//!
//! The store worker calls these functions to apply commands; each returns the item as it was
//! left in the database so callers can log the outcome. Savings are applied with a single
//! `UPDATE ... SET saved_amount = saved_amount + ?` so repeated deposits always accumulate.

use crate::{
    core::validation::{ensure_non_negative, invalid_amount, require_name},
    entities::{WishlistItemEntity, wishlist_item},
    errors::{Error, Result},
    models::{NewWishlistItem, WishlistItem},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves every wishlist item, most recently created first.
pub async fn get_all_items(db: &DatabaseConnection) -> Result<Vec<WishlistItem>> {
    let rows = WishlistItemEntity::find()
        .order_by_desc(wishlist_item::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(WishlistItem::from).collect())
}

/// Finds a wishlist item by its id.
pub async fn get_item_by_id<C>(db: &C, item_id: i64) -> Result<Option<WishlistItem>>
where
    C: ConnectionTrait,
{
    let row = WishlistItemEntity::find_by_id(item_id).one(db).await?;
    Ok(row.map(WishlistItem::from))
}

/// Creates a new wishlist item with nothing saved and the purchase flag cleared.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The target price is negative
/// - The database insert operation fails
pub async fn create_item(
    db: &DatabaseConnection,
    new_item: NewWishlistItem,
) -> Result<WishlistItem> {
    let name = require_name("item name", &new_item.name)?;
    let target_price = ensure_non_negative(new_item.target_price)?;

    let now = chrono::Utc::now().naive_utc();
    let item = wishlist_item::ActiveModel {
        name: Set(name),
        target_price: Set(target_price),
        category: Set(new_item.category.code().to_string()),
        saved_amount: Set(0),
        is_purchased: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = item.insert(db).await?;
    Ok(model.into())
}

/// Replaces every stored field of an existing item with the given record, keyed by its id.
///
/// # Errors
/// Returns an error if:
/// - The name is blank or an amount is negative
/// - No item with `item.id` exists
/// - The database update operation fails
pub async fn update_item(db: &DatabaseConnection, item: &WishlistItem) -> Result<WishlistItem> {
    let name = require_name("item name", &item.name)?;
    let target_price = ensure_non_negative(item.target_price)?;
    let saved_amount = ensure_non_negative(item.saved_amount)?;

    let mut active: wishlist_item::ActiveModel = WishlistItemEntity::find_by_id(item.id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item.id })?
        .into();

    active.name = Set(name);
    active.target_price = Set(target_price);
    active.category = Set(item.category.code().to_string());
    active.saved_amount = Set(saved_amount);
    active.is_purchased = Set(item.is_purchased);
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    Ok(active.update(db).await?.into())
}

/// Adds `amount` to an item's saved amount with one atomic SQL update.
///
/// The purchase flag is left untouched, even when the target is reached.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `item_id` - ID of the item to credit
/// * `amount` - Non-negative amount to add
///
/// # Errors
/// - `ItemNotFound` if no item has this id
/// - `InvalidAmount` if the amount is negative or the new total would overflow
pub async fn add_savings_atomic<C>(db: &C, item_id: i64, amount: i64) -> Result<WishlistItem>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    ensure_non_negative(amount)?;

    // Check against the stored total, not a caller's possibly stale copy
    let current = get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;
    if current.saved_amount.checked_add(amount).is_none() {
        return Err(invalid_amount(&amount.to_string()));
    }

    WishlistItemEntity::update_many()
        .col_expr(
            wishlist_item::Column::SavedAmount,
            Expr::col(wishlist_item::Column::SavedAmount).add(amount),
        )
        .col_expr(
            wishlist_item::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(wishlist_item::Column::Id.eq(item_id))
        .exec(db)
        .await?;

    get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })
}

/// Sets the purchase flag of an item without touching its savings.
pub async fn set_purchased<C>(db: &C, item_id: i64, purchased: bool) -> Result<WishlistItem>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    let result = WishlistItemEntity::update_many()
        .col_expr(wishlist_item::Column::IsPurchased, Expr::value(purchased))
        .col_expr(
            wishlist_item::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(wishlist_item::Column::Id.eq(item_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ItemNotFound { id: item_id });
    }

    get_item_by_id(db, item_id)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })
}

/// Deletes an item by id and returns the number of rows removed.
///
/// Deleting an id that is already gone removes nothing and is not an error, so the
/// command is safe to retry.
pub async fn delete_item(db: &DatabaseConnection, item_id: i64) -> Result<u64> {
    let result = WishlistItemEntity::delete_by_id(item_id).exec(db).await?;
    Ok(result.rows_affected)
}
