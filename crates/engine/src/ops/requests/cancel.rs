use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    BudgetLogEntry, DecisionCmd, EngineError, LogCategory, Money, RequestStatus, ResultEngine,
    budget_log, departments, products, requests, sequences::IdKind,
};

use super::super::{Engine, normalize_required_id, with_tx};

impl Engine {
    /// Cancels an approved request: a full reversal, not a status change.
    ///
    /// Atomically, with only the request row locked:
    /// - restores the product stock and the stored department balance by
    ///   blind increments (a department without a stored balance keeps
    ///   none: the derived value recovers once the row is gone),
    /// - appends a `Reversal` ledger entry with the negated total, unless
    ///   the total is zero,
    /// - deletes the request row. Only the ledger records the cancellation.
    pub async fn cancel_request(&self, cmd: DecisionCmd) -> ResultEngine<()> {
        let request_id = normalize_required_id(&cmd.request_id, "request id")?;
        let admin_id = normalize_required_id(&cmd.admin_id, "admin id")?;

        with_tx!(self, |db_tx| {
            let request = self.require_request_for_update(&db_tx, &request_id).await?;
            let status = RequestStatus::try_from(request.status.as_str())?;
            if status != RequestStatus::Approved {
                return Err(EngineError::BusinessRule(format!(
                    "only approved requests can be cancelled, {} is {}",
                    request.id,
                    status.as_str()
                )));
            }
            self.require_official(&db_tx, &admin_id).await?;

            let total_cost = Money::new(request.total_cost_minor);

            products::Entity::update_many()
                .col_expr(
                    products::Column::StockAvailable,
                    Expr::col(products::Column::StockAvailable).add(request.quantity),
                )
                .filter(products::Column::Id.eq(request.item_id.clone()))
                .exec(&db_tx)
                .await?;

            // SQL semantics keep a NULL balance NULL here, matching the
            // derived-budget departments.
            departments::Entity::update_many()
                .col_expr(
                    departments::Column::CurrentBudgetMinor,
                    Expr::col(departments::Column::CurrentBudgetMinor).add(total_cost.minor()),
                )
                .filter(departments::Column::Id.eq(request.dept_id.clone()))
                .exec(&db_tx)
                .await?;

            if !total_cost.is_zero() {
                let log_id = self.next_id(&db_tx, IdKind::BudgetLog).await?;
                let entry = BudgetLogEntry {
                    id: log_id,
                    category: LogCategory::Reversal,
                    dept_id: request.dept_id.clone(),
                    request_id: request.id.clone(),
                    admin_id: admin_id.clone(),
                    amount: -total_cost,
                    recorded_at: cmd.decided_at,
                };
                budget_log::ActiveModel::from(&entry).insert(&db_tx).await?;
            }

            let request_active = requests::ActiveModel {
                id: ActiveValue::Set(request.id.clone()),
                ..Default::default()
            };
            request_active.delete(&db_tx).await?;

            Ok(())
        })
    }
}
