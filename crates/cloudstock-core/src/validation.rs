//! # Validation Module
//!
//! Input validation and coercion for CloudStock forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                 │
//! │  ├── Required fields, date pickers, category dropdown                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: App command (Rust)                                           │
//! │  ├── THIS MODULE: names, dates, category allow-list                    │
//! │  └── Numeric fields are COERCED, never rejected                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger                                                        │
//! │  └── Builds records; derived fields are computed, not trusted           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Numbers
//! A blank or non-numeric amount becomes zero instead of an error, so a
//! half-filled expense form still saves. Negative amounts are accepted.
//!
//! ```rust
//! use cloudstock_core::validation::{coerce_money, coerce_quantity};
//!
//! assert_eq!(coerce_money("").sen(), 0);
//! assert_eq!(coerce_money("12.30").sen(), 1230);
//! assert_eq!(coerce_quantity("abc"), 0);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_NAME_LEN, MIN_PASSCODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Expense Categories
// =============================================================================

/// Suggested categories shown in the expense form.
pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Packaging",
    "Postage & Courier",
    "Advertising",
    "Platform Subscription",
    "Utilities",
    "Rental",
    "Salary & Wages",
    "Transport",
    "Equipment",
    "Others",
];

/// The allow-list an expense category is checked against.
///
/// Configurable per installation; defaults to [`DEFAULT_EXPENSE_CATEGORIES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseCategories(Vec<String>);

impl ExpenseCategories {
    pub fn new(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ExpenseCategories(categories.into_iter().map(Into::into).collect())
    }

    /// The category the expense form preselects.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|c| c == category)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExpenseCategories {
    fn default() -> Self {
        ExpenseCategories::new(DEFAULT_EXPENSE_CATEGORIES.iter().copied())
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an inventory item name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "item_name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "item_name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a `YYYY-MM-DD` date string.
///
/// The string itself is what gets stored, so the shape must be exact: the
/// monthly trend takes its first 7 characters as the month key.
///
/// ```rust
/// use cloudstock_core::validation::validate_date;
///
/// assert!(validate_date("date", "2024-02-29").is_ok());
/// assert!(validate_date("date", "2023-02-29").is_err());
/// assert!(validate_date("date", "2024-2-9").is_err());
/// ```
pub fn validate_date(field: &str, date: &str) -> ValidationResult<()> {
    if date.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let well_formed =
        date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected a calendar date as YYYY-MM-DD".to_string(),
        });
    }

    Ok(())
}

/// Checks an expense category against the allow-list.
pub fn validate_category(category: &str, allowed: &ExpenseCategories) -> ValidationResult<()> {
    if category.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if !allowed.contains(category) {
        return Err(ValidationError::NotAllowed {
            field: "category".to_string(),
            allowed: allowed.as_slice().to_vec(),
        });
    }

    Ok(())
}

/// Validates a local lock passcode.
///
/// ## Rules
/// - At least 4 characters
/// - Digits only (entered on a keypad)
pub fn validate_passcode(passcode: &str) -> ValidationResult<()> {
    if passcode.chars().count() < MIN_PASSCODE_LEN {
        return Err(ValidationError::TooShort {
            field: "passcode".to_string(),
            min: MIN_PASSCODE_LEN,
        });
    }

    if !passcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "passcode".to_string(),
            reason: "must contain digits only".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Coercion
// =============================================================================

/// Parses a money field, falling back to zero.
pub fn coerce_money(input: &str) -> Money {
    input.parse().unwrap_or_default()
}

/// Parses a quantity field, falling back to zero.
pub fn coerce_quantity(input: &str) -> i64 {
    input.trim().parse().unwrap_or(0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Bluetooth Earbuds").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
        assert!(validate_item_name(&"A".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("sale_date", "2024-05-10").is_ok());
        assert!(validate_date("sale_date", "").is_err());
        assert!(validate_date("sale_date", "2024-13-01").is_err());
        assert!(validate_date("sale_date", "20231-01").is_err());
        assert!(validate_date("sale_date", "10/05/2024").is_err());
    }

    #[test]
    fn test_validate_category() {
        let allowed = ExpenseCategories::default();
        assert!(validate_category("Packaging", &allowed).is_ok());
        assert!(validate_category("Yacht", &allowed).is_err());
        assert!(validate_category("", &allowed).is_err());

        let custom = ExpenseCategories::new(["Stall Rental"]);
        assert!(validate_category("Stall Rental", &custom).is_ok());
        assert!(validate_category("Packaging", &custom).is_err());
        assert_eq!(custom.first(), Some("Stall Rental"));
    }

    #[test]
    fn test_validate_passcode() {
        assert!(validate_passcode("1234").is_ok());
        assert!(validate_passcode("000000").is_ok());
        assert!(validate_passcode("123").is_err());
        assert!(validate_passcode("12a4").is_err());
    }

    #[test]
    fn test_coerce_money() {
        assert_eq!(coerce_money("150.00").sen(), 15_000);
        assert_eq!(coerce_money("").sen(), 0);
        assert_eq!(coerce_money("twelve").sen(), 0);
        assert_eq!(coerce_money("-20").sen(), -2_000);
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("10"), 10);
        assert_eq!(coerce_quantity(" 3 "), 3);
        assert_eq!(coerce_quantity(""), 0);
        assert_eq!(coerce_quantity("1.5"), 0);
    }
}
