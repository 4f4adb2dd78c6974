/// Singleton budget setting reads and upserts
pub mod budget;
/// Expense ledger inserts, deletes and listing
pub mod expense;
/// Label tables and text formatting
pub mod report;
/// Amount parsing and name checks
pub mod validation;
/// Wishlist item persistence
pub mod wishlist;
