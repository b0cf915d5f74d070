//! Read-only aggregates for dashboards and reporting.
//!
//! These queries run without locks and may observe slightly stale data
//! relative to in-flight transitions; they only ever read committed state.

use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryFilter, Statement, TransactionTrait, prelude::*,
};

use crate::{
    Money, RequestStatus, ResultEngine, departments, products, requests, vendors,
};

use super::{Engine, with_tx};

/// Entity counts and budget totals for the landing dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub departments: u64,
    pub vendors: u64,
    pub products: u64,
    pub requests: u64,
    pub approved_requests: u64,
    pub pending_requests: u64,
    pub rejected_requests: u64,
    /// Sum of stored department balances (derived-budget departments
    /// contribute nothing here).
    pub total_department_budget: Money,
}

/// Per-department request counts and spend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartmentKpiRow {
    pub dept_id: String,
    pub name: String,
    pub total_requests: u64,
    pub approved: u64,
    pub rejected: u64,
    pub pending: u64,
    /// Net ledger spend (procurement minus reversals).
    pub net_spend: Money,
    pub avg_request_cost: Option<Money>,
    pub max_request_cost: Option<Money>,
}

/// Per-category request volume and approved spend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySpendRow {
    pub category: String,
    pub requests: u64,
    pub approved_spend: Money,
    pub avg_unit_cost: Option<Money>,
}

/// Per-vendor product count and net spend through the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorPerformanceRow {
    pub vendor_id: String,
    pub company: String,
    pub product_count: u64,
    pub total_spend: Money,
}

impl Engine {
    pub async fn dashboard_metrics(&self) -> ResultEngine<DashboardMetrics> {
        with_tx!(self, |db_tx| {
            let departments = departments::Entity::find().count(&db_tx).await?;
            let vendors = vendors::Entity::find().count(&db_tx).await?;
            let products = products::Entity::find().count(&db_tx).await?;
            let requests = requests::Entity::find().count(&db_tx).await?;

            let mut by_status = [0u64; 3];
            for (i, status) in [
                RequestStatus::Approved,
                RequestStatus::Pending,
                RequestStatus::Rejected,
            ]
            .into_iter()
            .enumerate()
            {
                by_status[i] = requests::Entity::find()
                    .filter(requests::Column::Status.eq(status.as_str()))
                    .count(&db_tx)
                    .await?;
            }

            let backend = db_tx.get_database_backend();
            let stmt = Statement::from_string(
                backend,
                "SELECT COALESCE(SUM(current_budget_minor), 0) AS total FROM departments"
                    .to_string(),
            );
            let row = db_tx.query_one(stmt).await?;
            let total_minor = row.and_then(|r| r.try_get("", "total").ok()).unwrap_or(0);

            Ok(DashboardMetrics {
                departments,
                vendors,
                products,
                requests,
                approved_requests: by_status[0],
                pending_requests: by_status[1],
                rejected_requests: by_status[2],
                total_department_budget: Money::new(total_minor),
            })
        })
    }

    /// Per-department KPIs, ordered by net spend descending.
    pub async fn department_kpis(&self) -> ResultEngine<Vec<DepartmentKpiRow>> {
        with_tx!(self, |db_tx| {
            let backend = db_tx.get_database_backend();
            let stmt = Statement::from_string(
                backend,
                "SELECT d.id AS dept_id, d.name AS name, \
                        COUNT(pr.id) AS total_requests, \
                        COALESCE(SUM(CASE WHEN pr.status = 'Approved' THEN 1 ELSE 0 END), 0) AS approved, \
                        COALESCE(SUM(CASE WHEN pr.status = 'Rejected' THEN 1 ELSE 0 END), 0) AS rejected, \
                        COALESCE(SUM(CASE WHEN pr.status = 'Pending' THEN 1 ELSE 0 END), 0) AS pending, \
                        COALESCE((SELECT SUM(bl.amount_minor) FROM budget_log bl WHERE bl.dept_id = d.id), 0) AS net_spend_minor, \
                        COALESCE(SUM(pr.total_cost_minor), 0) AS cost_sum_minor, \
                        MAX(pr.total_cost_minor) AS max_cost_minor \
                 FROM departments d \
                 LEFT JOIN procurement_requests pr ON pr.dept_id = d.id \
                 GROUP BY d.id, d.name \
                 ORDER BY net_spend_minor DESC, d.id"
                    .to_string(),
            );
            let rows = db_tx.query_all(stmt).await?;

            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let total_requests: i64 = row.try_get("", "total_requests").unwrap_or(0);
                let cost_sum_minor: i64 = row.try_get("", "cost_sum_minor").unwrap_or(0);
                let avg_request_cost = if total_requests > 0 {
                    Some(Money::new(cost_sum_minor / total_requests))
                } else {
                    None
                };
                out.push(DepartmentKpiRow {
                    dept_id: row.try_get("", "dept_id")?,
                    name: row.try_get("", "name")?,
                    total_requests: total_requests.max(0) as u64,
                    approved: row.try_get::<i64>("", "approved").unwrap_or(0).max(0) as u64,
                    rejected: row.try_get::<i64>("", "rejected").unwrap_or(0).max(0) as u64,
                    pending: row.try_get::<i64>("", "pending").unwrap_or(0).max(0) as u64,
                    net_spend: Money::new(row.try_get("", "net_spend_minor").unwrap_or(0)),
                    avg_request_cost,
                    max_request_cost: row
                        .try_get::<Option<i64>>("", "max_cost_minor")
                        .ok()
                        .flatten()
                        .map(Money::new),
                });
            }
            Ok(out)
        })
    }

    /// Per-product-category request volume and approved spend, ordered by
    /// approved spend descending.
    pub async fn category_spend(&self) -> ResultEngine<Vec<CategorySpendRow>> {
        with_tx!(self, |db_tx| {
            let backend = db_tx.get_database_backend();
            let stmt = Statement::from_string(
                backend,
                "SELECT p.category AS category, \
                        COUNT(pr.id) AS requests, \
                        COUNT(*) AS joined_rows, \
                        COALESCE(SUM(CASE WHEN pr.status = 'Approved' THEN pr.total_cost_minor ELSE 0 END), 0) AS approved_spend_minor, \
                        COALESCE(SUM(p.unit_cost_minor), 0) AS unit_cost_sum_minor \
                 FROM products p \
                 LEFT JOIN procurement_requests pr ON pr.item_id = p.id \
                 GROUP BY p.category \
                 ORDER BY approved_spend_minor DESC, p.category"
                    .to_string(),
            );
            let rows = db_tx.query_all(stmt).await?;

            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let joined_rows: i64 = row.try_get("", "joined_rows").unwrap_or(0);
                let unit_cost_sum_minor: i64 = row.try_get("", "unit_cost_sum_minor").unwrap_or(0);
                let avg_unit_cost = if joined_rows > 0 {
                    Some(Money::new(unit_cost_sum_minor / joined_rows))
                } else {
                    None
                };
                out.push(CategorySpendRow {
                    category: row.try_get("", "category")?,
                    requests: row.try_get::<i64>("", "requests").unwrap_or(0).max(0) as u64,
                    approved_spend: Money::new(
                        row.try_get("", "approved_spend_minor").unwrap_or(0),
                    ),
                    avg_unit_cost,
                });
            }
            Ok(out)
        })
    }

    /// Per-vendor product count and ledger spend, ordered by spend
    /// descending.
    pub async fn vendor_performance(&self) -> ResultEngine<Vec<VendorPerformanceRow>> {
        with_tx!(self, |db_tx| {
            let backend = db_tx.get_database_backend();
            let stmt = Statement::from_string(
                backend,
                "SELECT v.id AS vendor_id, v.company AS company, \
                        (SELECT COUNT(*) FROM products px WHERE px.vendor_id = v.id) AS product_count, \
                        COALESCE(SUM(bl.amount_minor), 0) AS total_spend_minor \
                 FROM vendors v \
                 LEFT JOIN procurement_requests pr ON pr.vendor_id = v.id AND pr.status = 'Approved' \
                 LEFT JOIN budget_log bl ON bl.request_id = pr.id \
                 GROUP BY v.id, v.company \
                 ORDER BY total_spend_minor DESC, product_count DESC"
                    .to_string(),
            );
            let rows = db_tx.query_all(stmt).await?;

            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                out.push(VendorPerformanceRow {
                    vendor_id: row.try_get("", "vendor_id")?,
                    company: row.try_get("", "company")?,
                    product_count: row
                        .try_get::<i64>("", "product_count")
                        .unwrap_or(0)
                        .max(0) as u64,
                    total_spend: Money::new(row.try_get("", "total_spend_minor").unwrap_or(0)),
                });
            }
            Ok(out)
        })
    }
}
