//! # Error Types
//!
//! Domain-specific error types for cloudstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cloudstock-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Form input validation failures                 │
//! │  └── BackupError      - Backup file could not be restored              │
//! │                                                                         │
//! │  cloudstock-db errors (separate crate)                                 │
//! │  └── DbError          - Persistence failures                           │
//! │                                                                         │
//! │  cloudstock-app errors                                                 │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is *Not* an Error
//! Several failure modes degrade to a no-op instead of an error value:
//! refunding an unknown sale, blank numeric form fields (coerced to zero),
//! and an unreadable persisted blob (replaced by an empty aggregate).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An inventory batch referenced by id does not exist.
    #[error("Inventory batch not found: {0}")]
    BatchNotFound(String),

    /// The aggregate could not be serialized.
    #[error("Could not serialize records: {0}")]
    Serialization(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before a mutation reaches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid date, non-numeric amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Backup Error
// =============================================================================

/// Reasons a backup document is rejected.
///
/// Both variants leave the current aggregate untouched.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The file is not JSON at all.
    #[error("Could not read backup file: {0}")]
    Malformed(String),

    /// The file is JSON but not a CloudStock backup.
    #[error("Invalid backup file: {0}")]
    Invalid(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::BatchNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Inventory batch not found: abc");

        let err = BackupError::Invalid("sales must be an array".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid backup file: sales must be an array"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "item_name".to_string(),
        };
        assert_eq!(err.to_string(), "item_name is required");

        let err = ValidationError::TooShort {
            field: "passcode".to_string(),
            min: 4,
        };
        assert_eq!(err.to_string(), "passcode must be at least 4 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "category".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
