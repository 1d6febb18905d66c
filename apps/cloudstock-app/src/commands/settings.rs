//! # Settings Commands
//!
//! The optional passcode lock shown before the app opens.
//!
//! ```text
//! passcode_enabled() ── false ──► open directly
//!        │
//!        true
//!        ▼
//! unlock(attempt) ── false ──► stay on lock screen
//!        │
//!        true ──► open
//! ```

use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::App;

/// Whether the lock screen should be shown.
pub async fn passcode_enabled(app: &App) -> Result<bool, ApiError> {
    Ok(app.db().settings().passcode().await?.is_some())
}

pub async fn set_passcode(app: &App, passcode: String) -> Result<(), ApiError> {
    debug!("set_passcode command");
    app.db().settings().set_passcode(passcode.trim()).await?;
    Ok(())
}

pub async fn clear_passcode(app: &App) -> Result<(), ApiError> {
    debug!("clear_passcode command");
    app.db().settings().clear_passcode().await?;
    Ok(())
}

/// Checks an unlock attempt. Always succeeds when no passcode is set.
pub async fn unlock(app: &App, attempt: String) -> Result<bool, ApiError> {
    let unlocked = app.db().settings().verify_passcode(attempt.trim()).await?;
    if unlocked {
        info!("Unlocked");
    } else {
        warn!("Wrong passcode");
    }
    Ok(unlocked)
}
