//! Input validation shared by the aggregators and the persistence functions.
//!
//! Amount inputs arrive as text typed by the user. Anything that is not a plain run of
//! ASCII digits fitting in an `i64` is rejected, so signs, separators and decimals never
//! make it past this point.

use crate::errors::{Error, Result};

/// Parses a non-negative whole amount from user text. Surrounding whitespace is ignored.
pub fn parse_amount(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_amount(input));
    }
    trimmed.parse::<i64>().map_err(|_| invalid_amount(input))
}

/// Returns the trimmed name, or `BlankName` when nothing is left.
pub fn require_name(field: &'static str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::BlankName { field });
    }
    Ok(trimmed.to_string())
}

/// Rejects negative amounts that bypassed text parsing.
pub fn ensure_non_negative(amount: i64) -> Result<i64> {
    if amount < 0 {
        return Err(invalid_amount(&amount.to_string()));
    }
    Ok(amount)
}

pub(crate) fn invalid_amount(input: &str) -> Error {
    Error::InvalidAmount {
        input: input.to_string(),
    }
}
