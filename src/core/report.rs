//! Text rendering helpers.
//!
//! Label tables for categories and sort options live here, outside the enum definitions,
//! so a different locale only needs a different table. Amount and progress formatting is
//! used by the binary's status report.

use crate::{
    aggregator::{budget::BudgetSummary, wishlist::SortOption},
    models::{ItemCategory, WishlistItem},
};

/// Display label for a category.
#[must_use]
pub const fn category_label(category: ItemCategory) -> &'static str {
    match category {
        ItemCategory::Electronics => "Elektronik",
        ItemCategory::Fashion => "Fashion",
        ItemCategory::Skincare => "Skincare",
        ItemCategory::Toys => "Mainan",
        ItemCategory::Food => "Makanan",
        ItemCategory::Other => "Lainnya",
    }
}

/// Display label for a sort option.
#[must_use]
pub const fn sort_label(sort: SortOption) -> &'static str {
    match sort {
        SortOption::NameAscending => "Nama A-Z",
        SortOption::ProgressDescending => "Progress tertinggi",
        SortOption::TargetAscending => "Target terendah",
        SortOption::RemainingAscending => "Sisa paling kecil",
    }
}

/// Formats an amount with a currency prefix, e.g. `"Rp 500000"`.
#[must_use]
pub fn format_amount(prefix: &str, amount: i64) -> String {
    format!("{prefix} {amount}")
}

/// Like [`format_amount`], but an unset (zero) budget renders as a dash.
#[must_use]
pub fn format_budget_amount(prefix: &str, amount: i64) -> String {
    if amount == 0 {
        "—".to_string()
    } else {
        format_amount(prefix, amount)
    }
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
///
/// The bar itself is clamped to `[0, 1]`; the percentage label is not, so an
/// over-budget ratio still reads e.g. `128.6%`.
///
/// # Arguments
/// * `ratio` - Progress as a fraction (1.0 = 100%)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(ratio: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = ratio.clamp(0.0, 1.0);

    // Cast safety: clamped ∈ [0, 1], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (clamped * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);
    let percent = ratio * 100.0;

    format!("[{filled_str}{empty_str}] {percent:.1}%")
}

/// One-line rendering of a wishlist item.
#[must_use]
pub fn format_item_line(item: &WishlistItem, prefix: &str) -> String {
    let status = if item.is_purchased { " ✓" } else { "" };
    format!(
        "{}{} ({}) {} / {} {}",
        item.name,
        status,
        category_label(item.category),
        format_amount(prefix, item.saved_amount),
        format_amount(prefix, item.target_price),
        format_progress_bar(item.progress(), None),
    )
}

/// Multi-line rendering of a budget summary.
#[must_use]
pub fn format_budget_summary(summary: &BudgetSummary, prefix: &str) -> String {
    format!(
        "Daily: {}\nWeekly: {}\nSpent: {}\nRemaining: {}\n{}",
        format_budget_amount(prefix, summary.daily_budget),
        format_budget_amount(prefix, summary.weekly_budget),
        format_amount(prefix, summary.spent_total),
        format_amount(prefix, summary.remaining),
        format_progress_bar(summary.progress, None),
    )
}
