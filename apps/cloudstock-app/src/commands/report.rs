//! # Report Commands
//!
//! Read-only views recomputed from the current snapshot on every call.
//!
//! ```text
//! dashboard()           totals + low-stock list       (Dashboard cards)
//! monthly_trend()       last N months                 (Dashboard chart)
//! platform_breakdown()  revenue per platform          (Dashboard pie)
//! annual_report(year)   year-scoped P&L               (Tax report page)
//! ```

use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use cloudstock_core::metrics::{self, AnnualReport, DashboardSummary, MonthlyPoint, PlatformTotal};

use crate::error::ApiError;
use crate::App;

pub async fn dashboard(app: &App) -> Result<DashboardSummary, ApiError> {
    let data = app.store().snapshot().await;
    Ok(metrics::dashboard(
        &data,
        app.config().dashboard.low_stock_threshold,
    ))
}

pub async fn monthly_trend(app: &App) -> Result<Vec<MonthlyPoint>, ApiError> {
    let data = app.store().snapshot().await;
    Ok(metrics::monthly_trend(&data, app.config().dashboard.trend_months))
}

pub async fn platform_breakdown(app: &App) -> Result<Vec<PlatformTotal>, ApiError> {
    let data = app.store().snapshot().await;
    Ok(metrics::platform_breakdown(&data.sales))
}

/// Annual report plus the amounts pre-formatted for printing.
#[derive(Debug, Clone, Serialize)]
pub struct AnnualReportView {
    pub business_name: String,
    pub report: AnnualReport,
    pub formatted_net_profit: String,
}

/// Builds the annual report. `None` means the current year.
pub async fn annual_report(app: &App, year: Option<i32>) -> Result<AnnualReportView, ApiError> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    debug!(year, "annual_report command");

    let data = app.store().snapshot().await;
    let report = metrics::annual_report(&data, year);

    Ok(AnnualReportView {
        business_name: app.config().business.name.clone(),
        formatted_net_profit: app.config().format_currency(report.net_profit),
        report,
    })
}
