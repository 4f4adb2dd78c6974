/// Budget settings and expense ledger totals
pub mod budget;
/// Wishlist filtering, sorting and savings totals
pub mod wishlist;

pub use budget::{BudgetAggregator, BudgetSummary};
pub use wishlist::{SortOption, WishlistAggregator, WishlistTotals};
