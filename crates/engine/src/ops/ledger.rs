use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, Statement, TransactionTrait, prelude::*,
};

use crate::{BudgetLogEntry, LogCategory, Money, ResultEngine, budget_log};

use super::{Engine, normalize_required_id, with_tx};

/// Upper bound on rows returned by a single ledger query.
const MAX_LEDGER_ROWS: u64 = 1000;

/// Filters for reading the budget ledger.
#[derive(Clone, Debug, Default)]
pub struct LedgerFilter {
    pub dept_id: Option<String>,
    pub request_id: Option<String>,
    pub admin_id: Option<String>,
    pub category: Option<LogCategory>,
    /// Row cap; clamped to [`MAX_LEDGER_ROWS`].
    pub limit: Option<u64>,
}

impl Engine {
    /// Returns ledger entries matching `filter`, newest first.
    pub async fn get_ledger(&self, filter: &LedgerFilter) -> ResultEngine<Vec<BudgetLogEntry>> {
        with_tx!(self, |db_tx| {
            let mut query = budget_log::Entity::find();

            if let Some(dept_id) = &filter.dept_id {
                query = query.filter(budget_log::Column::DeptId.eq(dept_id.clone()));
            }
            if let Some(request_id) = &filter.request_id {
                query = query.filter(budget_log::Column::RequestId.eq(request_id.clone()));
            }
            if let Some(admin_id) = &filter.admin_id {
                query = query.filter(budget_log::Column::AdminId.eq(admin_id.clone()));
            }
            if let Some(category) = filter.category {
                query = query.filter(budget_log::Column::Category.eq(category.as_str()));
            }

            let limit = filter
                .limit
                .unwrap_or(MAX_LEDGER_ROWS)
                .min(MAX_LEDGER_ROWS);
            let rows = query
                .order_by_desc(budget_log::Column::RecordedAt)
                .order_by_desc(budget_log::Column::Id)
                .limit(limit)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(rows.len());
            for model in rows {
                out.push(BudgetLogEntry::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Net spend of a department: the signed sum of its ledger entries.
    pub async fn department_spend(&self, dept_id: &str) -> ResultEngine<Money> {
        let dept_id = normalize_required_id(dept_id, "department id")?;

        with_tx!(self, |db_tx| {
            self.require_department(&db_tx, &dept_id).await?;

            let backend = db_tx.get_database_backend();
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_minor), 0) AS spent \
                 FROM budget_log \
                 WHERE dept_id = ?",
                vec![dept_id.clone().into()],
            );
            let row = db_tx.query_one(stmt).await?;
            let minor = row.and_then(|r| r.try_get("", "spent").ok()).unwrap_or(0);
            Ok(Money::new(minor))
        })
    }
}
