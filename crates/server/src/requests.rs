//! Procurement request API endpoints

use api_types::request::{
    Decision, RequestCreated, RequestListQuery, RequestListResponse, RequestNew, RequestView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;

use engine::{
    CreateRequestCmd, DecisionCmd, ProcurementRequest, RequestListFilter, RequestStatus, SortOrder,
};

use crate::{ServerError, export, server::ServerState};

/// Timestamp rendering used by the CSV export.
const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn view(request: ProcurementRequest, resolved_name: Option<String>) -> RequestView {
    let approved_by = resolved_name.or_else(|| request.approval_authority.clone());
    RequestView {
        request_id: request.id,
        dept_id: request.dept_id,
        item_id: request.item_id,
        vendor_id: request.vendor_id,
        quantity: request.quantity,
        total_cost: request.total_cost.to_string(),
        status: request.status.as_str().to_string(),
        requested_at: request.requested_at,
        approved_by,
        decided_at: request.decided_at,
    }
}

fn filter_from_query(query: &RequestListQuery) -> Result<(RequestListFilter, SortOrder), ServerError> {
    let status = query
        .status
        .as_deref()
        .map(RequestStatus::try_from)
        .transpose()?;
    let filter = RequestListFilter {
        search: query.q.clone(),
        status,
        dept_id: query.dept.clone(),
    };
    let sort = match query.sort.as_deref() {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    };
    Ok((filter, sort))
}

/// Handle requests for creating a new procurement request
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RequestNew>,
) -> Result<Json<RequestCreated>, ServerError> {
    let request_id = state
        .engine
        .create_request(CreateRequestCmd::new(
            payload.dept_id,
            payload.item_id,
            payload.quantity,
            Utc::now(),
        ))
        .await?;

    Ok(Json(RequestCreated { request_id }))
}

/// Approve a pending request and return its updated view
pub async fn approve(
    State(state): State<ServerState>,
    Path(request_id): Path<String>,
    Json(payload): Json<Decision>,
) -> Result<Json<RequestView>, ServerError> {
    state
        .engine
        .approve_request(DecisionCmd::new(&request_id, payload.admin_id, Utc::now()))
        .await?;

    let request = state.engine.get_request(&request_id).await?;
    Ok(Json(view(request, None)))
}

/// Reject a pending request and return its updated view
pub async fn reject(
    State(state): State<ServerState>,
    Path(request_id): Path<String>,
    Json(payload): Json<Decision>,
) -> Result<Json<RequestView>, ServerError> {
    state
        .engine
        .reject_request(DecisionCmd::new(&request_id, payload.admin_id, Utc::now()))
        .await?;

    let request = state.engine.get_request(&request_id).await?;
    Ok(Json(view(request, None)))
}

/// Cancel an approved request: full reversal, the row is gone afterwards
pub async fn cancel(
    State(state): State<ServerState>,
    Path(request_id): Path<String>,
    Json(payload): Json<Decision>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .cancel_request(DecisionCmd::new(&request_id, payload.admin_id, Utc::now()))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List requests with resolved approver names
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<RequestListResponse>, ServerError> {
    let (filter, sort) = filter_from_query(&query)?;
    let rows = state.engine.list_requests(&filter, sort).await?;

    Ok(Json(RequestListResponse {
        requests: rows
            .into_iter()
            .map(|(request, name)| view(request, name))
            .collect(),
    }))
}

/// Download the request list as CSV, original column layout
pub async fn export_csv(
    State(state): State<ServerState>,
    Query(query): Query<RequestListQuery>,
) -> Result<Response, ServerError> {
    let (filter, sort) = filter_from_query(&query)?;
    let rows = state.engine.list_requests(&filter, sort).await?;

    let records = rows
        .into_iter()
        .map(|(request, name)| {
            let view = view(request, name);
            vec![
                view.request_id,
                view.dept_id,
                view.item_id,
                view.vendor_id,
                view.quantity.to_string(),
                view.total_cost,
                view.status,
                view.requested_at.format(EXPORT_TIME_FORMAT).to_string(),
                view.approved_by.unwrap_or_default(),
                view.decided_at
                    .map(|t| t.format(EXPORT_TIME_FORMAT).to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    export::csv_attachment(
        "requests.csv",
        &[
            "Request_ID",
            "Dept_ID",
            "Item_ID",
            "Vendor_ID",
            "Quantity",
            "Total_Cost",
            "Status",
            "Date_of_Request",
            "Approval_Authority",
            "Date_of_Approval",
        ],
        records,
    )
}
