//! Wishlist aggregator - filtered, sorted projections over the latest item snapshot.
//!
//! The aggregator never touches the database. It reads whatever snapshot the store last
//! published and turns user intent into store commands after validating the raw input.

use crate::{
    core::validation::{invalid_amount, parse_amount, require_name},
    errors::{Error, Result},
    models::{ItemCategory, NewWishlistItem, WishlistItem},
    store::{Snapshot, StoreHandle},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Order in which [`WishlistAggregator::view`] lists items.
///
/// Every ordering is stable: ties keep the snapshot order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Case-insensitive by name
    #[default]
    NameAscending,
    /// Highest progress first
    ProgressDescending,
    /// Cheapest target first
    TargetAscending,
    /// Smallest `target_price - saved_amount` first (not clamped, so over-saved items lead)
    RemainingAscending,
}

impl SortOption {
    /// Every sort option, in picker order.
    pub const ALL: [Self; 4] = [
        Self::NameAscending,
        Self::ProgressDescending,
        Self::TargetAscending,
        Self::RemainingAscending,
    ];
}

/// Totals over the unfiltered collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WishlistTotals {
    /// Sum of target prices
    pub total_target: i64,
    /// Sum of saved amounts
    pub total_saved: i64,
    /// `total_saved / total_target`, clamped to `[0, 1]`; 0 when nothing is targeted
    pub overall_progress: f64,
}

/// Keeps the items matching `filter` (all of them when `None`) and sorts them.
#[must_use]
pub fn filter_and_sort(
    items: &[WishlistItem],
    filter: Option<ItemCategory>,
    sort: SortOption,
) -> Vec<WishlistItem> {
    let mut view: Vec<WishlistItem> = items
        .iter()
        .filter(|item| filter.is_none_or(|category| item.category == category))
        .cloned()
        .collect();

    // `sort_by*` are stable, which is what keeps ties in snapshot order
    match sort {
        SortOption::NameAscending => view.sort_by_cached_key(|item| item.name.to_lowercase()),
        SortOption::ProgressDescending => {
            view.sort_by(|a, b| b.progress().total_cmp(&a.progress()));
        }
        SortOption::TargetAscending => view.sort_by_key(|item| item.target_price),
        SortOption::RemainingAscending => view.sort_by_key(WishlistItem::remaining),
    }
    view
}

/// Sums targets and savings and derives the overall progress.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_totals(items: &[WishlistItem]) -> WishlistTotals {
    let total_target = items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.target_price));
    let total_saved = items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.saved_amount));

    let overall_progress = if total_target > 0 {
        (total_saved as f64 / total_target as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    WishlistTotals {
        total_target,
        total_saved,
        overall_progress,
    }
}

/// Derived view over the wishlist collection.
#[derive(Debug)]
pub struct WishlistAggregator {
    store: StoreHandle,
    items: watch::Receiver<Snapshot<WishlistItem>>,
    filter: Option<ItemCategory>,
    sort: SortOption,
}

impl WishlistAggregator {
    /// Subscribes to the store's wishlist snapshots. Starts unfiltered, sorted by name.
    #[must_use]
    pub fn new(store: StoreHandle) -> Self {
        let items = store.subscribe_items();
        Self {
            store,
            items,
            filter: None,
            sort: SortOption::default(),
        }
    }

    /// Replaces the initial sort option.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Restricts the view to one category, or clears the filter with `None`.
    pub fn set_filter(&mut self, category: Option<ItemCategory>) {
        self.filter = category;
    }

    /// Current category filter.
    #[must_use]
    pub const fn filter(&self) -> Option<ItemCategory> {
        self.filter
    }

    /// Changes how the view is ordered.
    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
    }

    /// Current sort option.
    #[must_use]
    pub const fn sort(&self) -> SortOption {
        self.sort
    }

    /// The latest unfiltered snapshot, in store order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<WishlistItem> {
        Arc::clone(&self.items.borrow())
    }

    /// The latest snapshot, filtered then sorted.
    #[must_use]
    pub fn view(&self) -> Vec<WishlistItem> {
        filter_and_sort(&self.items.borrow(), self.filter, self.sort)
    }

    /// Totals over the unfiltered snapshot.
    #[must_use]
    pub fn totals(&self) -> WishlistTotals {
        compute_totals(&self.items.borrow())
    }

    /// Validates the input and requests a new item with nothing saved yet.
    ///
    /// # Errors
    /// `BlankName` or `InvalidAmount` when the input is rejected; nothing is sent to the store.
    pub fn add_item(&self, name: &str, target_price: &str, category: ItemCategory) -> Result<()> {
        let name = require_name("item name", name)?;
        let target_price = parse_amount(target_price)?;
        debug!("Requesting new wishlist item '{}'", name);
        self.store.insert_item(NewWishlistItem {
            name,
            target_price,
            category,
        })
    }

    /// Validates the amount and requests `saved_amount += amount` on the item.
    ///
    /// The purchase flag is not touched, even if the target is reached.
    ///
    /// # Errors
    /// - `InvalidAmount` if the text is not a non-negative whole number, or the new total
    ///   would overflow
    /// - `ItemNotFound` if the item is not in the current snapshot
    pub fn add_savings(&self, item_id: i64, amount: &str) -> Result<()> {
        let value = parse_amount(amount)?;
        let saved_amount = self
            .items
            .borrow()
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.saved_amount)
            .ok_or(Error::ItemNotFound { id: item_id })?;

        if saved_amount.checked_add(value).is_none() {
            return Err(invalid_amount(amount));
        }
        self.store.add_savings(item_id, value)
    }

    /// Requests the purchase flag be set to `value`.
    pub fn toggle_purchased(&self, item_id: i64, value: bool) -> Result<()> {
        self.store.set_purchased(item_id, value)
    }

    /// Requests the item be deleted.
    pub fn delete_item(&self, item_id: i64) -> Result<()> {
        self.store.delete_item(item_id)
    }

    /// Waits for the store to publish a new snapshot.
    ///
    /// # Errors
    /// `StoreClosed` once the store worker has stopped.
    pub async fn changed(&mut self) -> Result<()> {
        self.items.changed().await.map_err(|_| Error::StoreClosed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::store::StoreCommand;
    use crate::test_utils::*;
    use tokio::sync::mpsc;

    fn item(id: i64, name: &str, target: i64, saved: i64, category: ItemCategory) -> WishlistItem {
        WishlistItem {
            id,
            name: name.to_string(),
            target_price: target,
            category,
            saved_amount: saved,
            is_purchased: false,
        }
    }

    fn sample_items() -> Vec<WishlistItem> {
        vec![
            item(1, "watch", 1_000, 500, ItemCategory::Fashion),
            item(2, "Laptop", 10_000, 2_500, ItemCategory::Electronics),
            item(3, "Bear", 200, 200, ItemCategory::Toys),
            item(4, "Phone", 5_000, 2_500, ItemCategory::Electronics),
            item(5, "Cake", 200, 260, ItemCategory::Food),
            item(6, "apron", 0, 0, ItemCategory::Other),
        ]
    }

    fn ids(items: &[WishlistItem]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    /// Aggregator over a fixed snapshot, with the commands it issues captured.
    fn detached_aggregator(
        items: Vec<WishlistItem>,
    ) -> (
        WishlistAggregator,
        watch::Sender<Snapshot<WishlistItem>>,
        mpsc::UnboundedReceiver<StoreCommand>,
    ) {
        let (items_tx, items_rx) = watch::channel(Snapshot::from(items));
        let (_, expenses_rx) = watch::channel(Snapshot::from(Vec::new()));
        let (_, budget_rx) = watch::channel(None);
        let (store, commands) = StoreHandle::detached(items_rx, expenses_rx, budget_rx);
        (WishlistAggregator::new(store), items_tx, commands)
    }

    #[test]
    fn test_filter_by_category() {
        let items = sample_items();
        let view = filter_and_sort(&items, Some(ItemCategory::Electronics), SortOption::default());
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|i| i.category == ItemCategory::Electronics));
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let items = sample_items();
        let view = filter_and_sort(&items, None, SortOption::TargetAscending);
        assert_eq!(view.len(), items.len());
    }

    #[test]
    fn test_filter_with_no_matches_is_empty() {
        let items = vec![item(1, "Bear", 10, 0, ItemCategory::Toys)];
        assert!(filter_and_sort(&items, Some(ItemCategory::Skincare), SortOption::default()).is_empty());
    }

    #[test]
    fn test_sort_name_is_case_insensitive() {
        let view = filter_and_sort(&sample_items(), None, SortOption::NameAscending);
        let names: Vec<&str> = view.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apron", "Bear", "Cake", "Laptop", "Phone", "watch"]);
    }

    #[test]
    fn test_sort_name_case_only_ties_keep_snapshot_order() {
        let items = vec![
            item(7, "apple", 10, 0, ItemCategory::Food),
            item(8, "Apple", 20, 0, ItemCategory::Food),
            item(9, "APPLE", 30, 0, ItemCategory::Food),
            item(10, "Acorn", 40, 0, ItemCategory::Other),
        ];
        let view = filter_and_sort(&items, None, SortOption::NameAscending);
        assert_eq!(ids(&view), vec![10, 7, 8, 9]);

        let reversed: Vec<WishlistItem> = items.into_iter().rev().collect();
        let view = filter_and_sort(&reversed, None, SortOption::NameAscending);
        assert_eq!(ids(&view), vec![10, 9, 8, 7]);
    }

    #[test]
    fn test_sort_progress_descending_is_stable() {
        let view = filter_and_sort(&sample_items(), None, SortOption::ProgressDescending);
        // Bear (1.0) and Cake (clamped 1.0) keep snapshot order, as do watch/Phone (0.5)
        assert_eq!(ids(&view), vec![3, 5, 1, 4, 2, 6]);
    }

    #[test]
    fn test_sort_target_ascending_is_stable() {
        let view = filter_and_sort(&sample_items(), None, SortOption::TargetAscending);
        assert_eq!(ids(&view), vec![6, 3, 5, 1, 4, 2]);
    }

    #[test]
    fn test_sort_remaining_ascending_allows_negative() {
        let view = filter_and_sort(&sample_items(), None, SortOption::RemainingAscending);
        // Cake is over-saved by 60, so it sorts ahead of the fully saved ones
        assert_eq!(ids(&view), vec![5, 3, 6, 1, 4, 2]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        for sort in SortOption::ALL {
            let once = filter_and_sort(&sample_items(), None, sort);
            let twice = filter_and_sort(&once, None, sort);
            assert_eq!(once, twice, "{sort:?} should be idempotent");
        }
    }

    #[test]
    fn test_totals_over_unfiltered_collection() {
        let totals = compute_totals(&sample_items());
        assert_eq!(totals.total_target, 16_400);
        assert_eq!(totals.total_saved, 5_960);
        assert_eq!(totals.overall_progress, 5_960.0 / 16_400.0);
    }

    #[test]
    fn test_totals_progress_clamped_when_over_saved() {
        let items = vec![item(1, "Cake", 100, 300, ItemCategory::Food)];
        let totals = compute_totals(&items);
        assert_eq!(totals.total_saved, 300);
        assert_eq!(totals.overall_progress, 1.0);
    }

    #[test]
    fn test_totals_empty() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.total_target, 0);
        assert_eq!(totals.overall_progress, 0.0);
    }

    #[test]
    fn test_view_uses_filter_and_sort_state() {
        let (mut aggregator, _items, _commands) = detached_aggregator(sample_items());
        aggregator.set_filter(Some(ItemCategory::Electronics));
        aggregator.set_sort(SortOption::TargetAscending);

        assert_eq!(ids(&aggregator.view()), vec![4, 2]);
        // Totals ignore the filter
        assert_eq!(aggregator.totals().total_target, 16_400);

        aggregator.set_filter(None);
        assert_eq!(aggregator.view().len(), 6);
    }

    #[test]
    fn test_view_follows_new_snapshots() {
        let (aggregator, items_tx, _commands) = detached_aggregator(Vec::new());
        assert!(aggregator.view().is_empty());

        items_tx.send_replace(Arc::from(sample_items()));
        assert_eq!(aggregator.view().len(), 6);
        assert_eq!(aggregator.snapshot().len(), 6);
    }

    #[test]
    fn test_add_item_sends_insert() {
        let (aggregator, _items, mut commands) = detached_aggregator(Vec::new());
        aggregator
            .add_item(" Headphones ", "500000", ItemCategory::Electronics)
            .unwrap();

        match commands.try_recv().unwrap() {
            StoreCommand::InsertItem(new_item) => assert_eq!(
                new_item,
                NewWishlistItem {
                    name: "Headphones".to_string(),
                    target_price: 500_000,
                    category: ItemCategory::Electronics,
                }
            ),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_add_item_rejects_invalid_input() {
        let (aggregator, _items, mut commands) = detached_aggregator(Vec::new());

        let blank = aggregator.add_item("  ", "100", ItemCategory::Other);
        assert!(matches!(blank, Err(Error::BlankName { .. })));

        let bad_price = aggregator.add_item("Shoes", "12k", ItemCategory::Fashion);
        assert!(matches!(bad_price, Err(Error::InvalidAmount { .. })));

        let negative = aggregator.add_item("Shoes", "-5", ItemCategory::Fashion);
        assert!(matches!(negative, Err(Error::InvalidAmount { .. })));

        assert!(commands.try_recv().is_err());
    }

    #[test]
    fn test_add_savings_validation() {
        let (aggregator, _items, mut commands) =
            detached_aggregator(vec![item(1, "Bear", 100, i64::MAX - 1, ItemCategory::Toys)]);

        assert!(matches!(
            aggregator.add_savings(1, "abc"),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            aggregator.add_savings(9, "10"),
            Err(Error::ItemNotFound { id: 9 })
        ));
        // Would overflow the stored total
        assert!(matches!(
            aggregator.add_savings(1, "5"),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(commands.try_recv().is_err());

        aggregator.add_savings(1, "1").unwrap();
        assert!(matches!(
            commands.try_recv().unwrap(),
            StoreCommand::AddSavings { id: 1, amount: 1 }
        ));
    }

    #[test]
    fn test_toggle_and_delete_send_commands() {
        let (aggregator, _items, mut commands) = detached_aggregator(Vec::new());
        aggregator.toggle_purchased(3, true).unwrap();
        aggregator.delete_item(3).unwrap();

        assert!(matches!(
            commands.try_recv().unwrap(),
            StoreCommand::SetPurchased {
                id: 3,
                purchased: true
            }
        ));
        assert!(matches!(
            commands.try_recv().unwrap(),
            StoreCommand::DeleteItem(3)
        ));
    }

    #[test]
    fn test_commands_fail_when_store_closed() {
        let (aggregator, _items, commands) = detached_aggregator(Vec::new());
        drop(commands);
        assert!(matches!(
            aggregator.delete_item(1),
            Err(Error::StoreClosed)
        ));
    }

    #[tokio::test]
    async fn test_headphones_savings_do_not_mark_purchased() -> Result<()> {
        init_test_tracing();
        let (store, _task) = setup_test_store().await?;
        let mut aggregator = WishlistAggregator::new(store.clone());

        aggregator.add_item("Headphones", "500000", ItemCategory::Electronics)?;
        aggregator.changed().await?;
        let id = aggregator.view()[0].id;
        assert_eq!(aggregator.view()[0].progress(), 0.0);

        aggregator.add_savings(id, "200000")?;
        store.sync().await?;
        assert_eq!(aggregator.view()[0].progress(), 0.4);

        aggregator.add_savings(id, "300000")?;
        store.sync().await?;
        let headphones = aggregator.view()[0].clone();
        assert_eq!(headphones.progress(), 1.0);
        assert_eq!(headphones.saved_amount, 500_000);
        assert!(!headphones.is_purchased);

        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_savings_are_additive() -> Result<()> {
        let (store, _task) = setup_test_store().await?;
        let aggregator = WishlistAggregator::new(store.clone());

        aggregator.add_item("Sneakers", "1000", ItemCategory::Fashion)?;
        store.sync().await?;
        let id = aggregator.snapshot()[0].id;

        // Both issued before either round-trips through the store
        aggregator.add_savings(id, "100")?;
        aggregator.add_savings(id, "100")?;
        store.sync().await?;

        assert_eq!(aggregator.snapshot()[0].saved_amount, 200);
        Ok(())
    }

    #[tokio::test]
    async fn test_pending_deposits_cannot_overflow_stored_total() -> Result<()> {
        init_test_tracing();
        let (store, _task) = setup_test_store().await?;
        let aggregator = WishlistAggregator::new(store.clone());

        aggregator.add_item("Console", "100", ItemCategory::Electronics)?;
        store.sync().await?;
        let id = aggregator.snapshot()[0].id;

        // Both pass the snapshot check since neither has been applied yet
        aggregator.add_savings(id, &i64::MAX.to_string())?;
        aggregator.add_savings(id, "1")?;
        store.sync().await?;
        assert_eq!(aggregator.snapshot()[0].saved_amount, i64::MAX);

        // Later commands still refresh the snapshot
        aggregator.add_item("Later", "10", ItemCategory::Other)?;
        store.sync().await?;
        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.len(), 2);
        let console = snapshot.iter().find(|item| item.id == id).unwrap();
        assert_eq!(console.saved_amount, i64::MAX);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_and_delete_round_trip() -> Result<()> {
        let (store, _task) = setup_test_store().await?;
        let aggregator = WishlistAggregator::new(store.clone());

        aggregator.add_item("Serum", "150000", ItemCategory::Skincare)?;
        store.sync().await?;
        let id = aggregator.snapshot()[0].id;

        aggregator.toggle_purchased(id, true)?;
        store.sync().await?;
        assert!(aggregator.snapshot()[0].is_purchased);
        assert_eq!(aggregator.snapshot()[0].saved_amount, 0);

        aggregator.delete_item(id)?;
        store.sync().await?;
        assert!(aggregator.view().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_changed_reports_closed_store() -> Result<()> {
        let (items_tx, items_rx) = watch::channel(Snapshot::from(Vec::new()));
        let (_, expenses_rx) = watch::channel(Snapshot::from(Vec::new()));
        let (_, budget_rx) = watch::channel(None);
        let (store, _commands) = StoreHandle::detached(items_rx, expenses_rx, budget_rx);
        let mut aggregator = WishlistAggregator::new(store);

        drop(items_tx);
        assert!(matches!(aggregator.changed().await, Err(Error::StoreClosed)));
        Ok(())
    }
}
