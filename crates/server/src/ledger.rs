//! Budget ledger API endpoints

use api_types::ledger::{LedgerEntryView, LedgerQuery, LedgerResponse};
use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};

use engine::{BudgetLogEntry, LedgerFilter, LogCategory};

use crate::{ServerError, export, server::ServerState};

const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn view(entry: BudgetLogEntry) -> LedgerEntryView {
    LedgerEntryView {
        log_id: entry.id,
        category: entry.category.as_str().to_string(),
        dept_id: entry.dept_id,
        request_id: entry.request_id,
        admin_id: entry.admin_id,
        amount: entry.amount.to_string(),
        recorded_at: entry.recorded_at,
    }
}

fn filter_from_query(query: &LedgerQuery) -> Result<LedgerFilter, ServerError> {
    let category = query
        .category
        .as_deref()
        .map(LogCategory::try_from)
        .transpose()?;
    Ok(LedgerFilter {
        dept_id: query.dept.clone(),
        request_id: query.request.clone(),
        admin_id: query.admin.clone(),
        category,
        limit: None,
    })
}

/// List ledger entries, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let filter = filter_from_query(&query)?;
    let entries = state.engine.get_ledger(&filter).await?;

    Ok(Json(LedgerResponse {
        entries: entries.into_iter().map(view).collect(),
    }))
}

/// Download the ledger as CSV, original column layout
pub async fn export_csv(
    State(state): State<ServerState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Response, ServerError> {
    let filter = filter_from_query(&query)?;
    let entries = state.engine.get_ledger(&filter).await?;

    let records = entries
        .into_iter()
        .map(|entry| {
            let view = view(entry);
            vec![
                view.log_id,
                view.category,
                view.dept_id,
                view.request_id,
                view.admin_id,
                view.amount,
                view.recorded_at.format(EXPORT_TIME_FORMAT).to_string(),
            ]
        })
        .collect();

    export::csv_attachment(
        "budget_log.csv",
        &[
            "Log_ID",
            "Category",
            "Dept_ID",
            "Request_ID",
            "Admin_ID",
            "Amount",
            "Timestamp",
        ],
        records,
    )
}
