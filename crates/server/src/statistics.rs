//! Dashboard and analytics API endpoints
//!
//! Read-only aggregates; these observe committed state and never lock.

use api_types::stats::{CategorySpend, DashboardMetrics, DepartmentKpi, VendorPerformance};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn dashboard(
    State(state): State<ServerState>,
) -> Result<Json<DashboardMetrics>, ServerError> {
    let metrics = state.engine.dashboard_metrics().await?;

    Ok(Json(DashboardMetrics {
        departments: metrics.departments,
        vendors: metrics.vendors,
        products: metrics.products,
        requests: metrics.requests,
        approved_requests: metrics.approved_requests,
        pending_requests: metrics.pending_requests,
        rejected_requests: metrics.rejected_requests,
        total_department_budget: metrics.total_department_budget.to_string(),
    }))
}

pub async fn department_kpis(
    State(state): State<ServerState>,
) -> Result<Json<Vec<DepartmentKpi>>, ServerError> {
    let rows = state.engine.department_kpis().await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| DepartmentKpi {
                dept_id: row.dept_id,
                name: row.name,
                total_requests: row.total_requests,
                approved: row.approved,
                rejected: row.rejected,
                pending: row.pending,
                net_spend: row.net_spend.to_string(),
                avg_request_cost: row.avg_request_cost.map(|m| m.to_string()),
                max_request_cost: row.max_request_cost.map(|m| m.to_string()),
            })
            .collect(),
    ))
}

pub async fn category_spend(
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategorySpend>>, ServerError> {
    let rows = state.engine.category_spend().await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| CategorySpend {
                category: row.category,
                requests: row.requests,
                approved_spend: row.approved_spend.to_string(),
                avg_unit_cost: row.avg_unit_cost.map(|m| m.to_string()),
            })
            .collect(),
    ))
}

pub async fn vendor_performance(
    State(state): State<ServerState>,
) -> Result<Json<Vec<VendorPerformance>>, ServerError> {
    let rows = state.engine.vendor_performance().await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| VendorPerformance {
                vendor_id: row.vendor_id,
                company: row.company,
                product_count: row.product_count,
                total_spend: row.total_spend.to_string(),
            })
            .collect(),
    ))
}
