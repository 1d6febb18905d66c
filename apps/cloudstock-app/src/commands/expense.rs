//! # Expense Commands

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cloudstock_core::metrics::{expense_totals_by_type, ExpenseTypeTotals};
use cloudstock_core::validation::{coerce_money, validate_category, validate_date};
use cloudstock_core::{generate_id, Expense, ExpenseType, NewExpense};

use crate::error::ApiError;
use crate::App;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub date_spent: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: String,
    #[serde(rename = "type", default)]
    pub kind: ExpenseType,
}

/// Records an expense at the top of the expense list.
pub async fn record_expense(app: &App, form: ExpenseForm) -> Result<Expense, ApiError> {
    debug!(category = %form.category, kind = %form.kind, "record_expense command");

    validate_date("date_spent", &form.date_spent)?;
    validate_category(&form.category, &app.config().expenses.categories)?;

    let expense = Expense::record(
        NewExpense {
            date_spent: form.date_spent,
            category: form.category,
            description: form.description.trim().to_string(),
            amount: coerce_money(&form.amount),
            kind: form.kind,
        },
        generate_id(),
    );

    app.store()
        .apply({
            let expense = expense.clone();
            move |data| data.with_expense(expense)
        })
        .await?;

    info!(
        expense_id = %expense.id,
        kind = %expense.kind,
        amount = %expense.amount,
        "Expense recorded"
    );
    Ok(expense)
}

/// The expense list plus per-type totals for the screen header.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSummary {
    pub expenses: Vec<Expense>,
    pub totals: ExpenseTypeTotals,
    /// Allowed categories, first one preselected in the form.
    pub categories: Vec<String>,
}

pub async fn expense_summary(app: &App) -> Result<ExpenseSummary, ApiError> {
    let data = app.store().snapshot().await;
    Ok(ExpenseSummary {
        totals: expense_totals_by_type(&data.expenses),
        expenses: data.expenses,
        categories: app.config().expenses.categories.as_slice().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::app;

    fn form(category: &str, amount: &str, kind: ExpenseType) -> ExpenseForm {
        ExpenseForm {
            date_spent: "2024-06-10".to_string(),
            category: category.to_string(),
            description: "  courier top-up ".to_string(),
            amount: amount.to_string(),
            kind,
        }
    }

    #[tokio::test]
    async fn test_record_expense() {
        let app = app().await;
        let expense = record_expense(&app, form("Postage & Courier", "45.00", ExpenseType::Operating))
            .await
            .unwrap();

        assert_eq!(expense.amount.sen(), 4_500);
        assert_eq!(expense.description, "courier top-up");
        assert_eq!(app.store().snapshot().await.expenses.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_unknown_category() {
        let app = app().await;
        let err = record_expense(&app, form("Holiday", "10", ExpenseType::Operating))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_expense_summary_totals_by_type() {
        let app = app().await;
        record_expense(&app, form("Packaging", "10.00", ExpenseType::Operating))
            .await
            .unwrap();
        record_expense(&app, form("Others", "500", ExpenseType::Drawing))
            .await
            .unwrap();
        record_expense(&app, form("Packaging", "", ExpenseType::Operating))
            .await
            .unwrap();

        let summary = expense_summary(&app).await.unwrap();
        assert_eq!(summary.expenses.len(), 3);
        assert_eq!(summary.totals.operating.sen(), 1_000);
        assert_eq!(summary.totals.drawing.sen(), 50_000);
        assert_eq!(summary.categories[0], "Packaging");
    }

    #[test]
    fn test_form_uses_type_field() {
        let form: ExpenseForm = serde_json::from_str(
            r#"{"date_spent":"2024-01-01","category":"Packaging","amount":"5","type":"Capital"}"#,
        )
        .unwrap();
        assert_eq!(form.kind, ExpenseType::Capital);
    }
}
