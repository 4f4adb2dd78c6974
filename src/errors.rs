//! Unified error type for the wishlist and budget core.
//!
//! Validation failures (`BlankName`, `InvalidAmount`) are raised locally and never reach the
//! store. Database failures only surface from the `core` persistence functions; the store worker
//! logs them instead of propagating.

use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A required name was empty or whitespace-only.
    #[error("{field} cannot be blank")]
    BlankName {
        /// Which input was blank (e.g. `"item name"`)
        field: &'static str,
    },

    /// Text could not be read as a non-negative whole amount, or arithmetic on it overflowed.
    #[error("Invalid amount: {input:?} is not a non-negative whole number")]
    InvalidAmount {
        /// The rejected input, as typed
        input: String,
    },

    /// No wishlist item with this id exists.
    #[error("Wishlist item not found: {id}")]
    ItemNotFound {
        /// The requested item id
        id: i64,
    },

    /// No expense with this id exists.
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// The requested expense id
        id: i64,
    },

    /// The store worker has stopped and no longer accepts commands.
    #[error("Store is closed")]
    StoreClosed,

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong
        message: String,
    },

    /// Error raised by `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors caused by user input rather than by the store or environment.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::BlankName { .. } | Self::InvalidAmount { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
