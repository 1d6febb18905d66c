//! # Backup Documents
//!
//! A backup is the whole aggregate as pretty-printed JSON. Restore is
//! all-or-nothing: a document is either accepted in full or rejected with
//! the current records left untouched.
//!
//! ## Restore Checks
//! ```text
//! text ──► JSON parse ──✗──► BackupError::Malformed
//!              │
//!              ▼
//!     inventory & sales are arrays? ──✗──► BackupError::Invalid
//!              │
//!              ▼
//!     records fit the types? ──✗──► BackupError::Invalid
//!              │
//!              ▼
//!           AppData
//! ```

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{BackupError, CoreError, CoreResult};
use crate::types::AppData;

/// Serializes the aggregate with 2-space indentation.
pub fn encode_backup(data: &AppData) -> CoreResult<String> {
    serde_json::to_string_pretty(data).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// `cloudstock_backup_YYYY-MM-DD.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("cloudstock_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Parses and validates a backup document.
pub fn decode_backup(text: &str) -> Result<AppData, BackupError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| BackupError::Malformed(e.to_string()))?;

    for collection in ["inventory", "sales"] {
        if !value.get(collection).is_some_and(Value::is_array) {
            return Err(BackupError::Invalid(format!(
                "{collection} must be an array"
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| BackupError::Invalid(e.to_string()))
}
