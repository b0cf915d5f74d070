use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait, prelude::*,
};

use crate::{
    BudgetLogEntry, DecisionCmd, EngineError, LogCategory, Money, RequestStatus, ResultEngine,
    budget_log, departments, products, requests, sequences::IdKind,
};

use super::super::{Engine, normalize_required_id, with_tx};

impl Engine {
    /// Approves a pending request: `Pending → Approved`.
    ///
    /// Atomically, with rows locked in the order request → department →
    /// product:
    /// - verifies the effective budget covers the total cost and the stock
    ///   covers the quantity,
    /// - decrements stock and the stored department balance,
    /// - appends a `Procurement` ledger entry,
    /// - stamps the request with the decision time and the resolved
    ///   official name.
    ///
    /// A department without a stored balance is not written to: its
    /// effective budget is derived from approved spend, which now includes
    /// this request.
    pub async fn approve_request(&self, cmd: DecisionCmd) -> ResultEngine<()> {
        let request_id = normalize_required_id(&cmd.request_id, "request id")?;
        let admin_id = normalize_required_id(&cmd.admin_id, "admin id")?;

        with_tx!(self, |db_tx| {
            let request = self.require_request_for_update(&db_tx, &request_id).await?;
            let status = RequestStatus::try_from(request.status.as_str())?;
            if status != RequestStatus::Pending {
                return Err(EngineError::BusinessRule(format!(
                    "only pending requests can be approved, {} is {}",
                    request.id,
                    status.as_str()
                )));
            }
            let official = self.require_official(&db_tx, &admin_id).await?;

            let department = self
                .require_department_for_update(&db_tx, &request.dept_id)
                .await?;
            let product = self
                .require_product_for_update(&db_tx, &request.item_id)
                .await?;

            let quantity = u32::try_from(request.quantity).map_err(|_| {
                EngineError::Validation(format!("invalid quantity on request {}", request.id))
            })?;

            // Legacy rows may carry a zero total: recompute from the current
            // unit cost before checking funds.
            let total_cost = if request.total_cost_minor == 0 {
                Money::new(product.unit_cost_minor)
                    .checked_mul_quantity(quantity)
                    .ok_or_else(|| {
                        EngineError::Validation("total cost too large".to_string())
                    })?
            } else {
                Money::new(request.total_cost_minor)
            };

            let effective_budget = match department.current_budget_minor {
                Some(minor) => Money::new(minor),
                None => {
                    let approved = self.approved_spend(&db_tx, &department.id).await?;
                    Money::new(department.budget_allocation_minor) - approved
                }
            };
            if effective_budget < total_cost {
                return Err(EngineError::InsufficientFunds(format!(
                    "department {} has {} available, request {} costs {}",
                    department.id, effective_budget, request.id, total_cost
                )));
            }
            if (product.stock_available as i64) < i64::from(quantity) {
                return Err(EngineError::InsufficientStock(format!(
                    "product {} has {} in stock, requested {}",
                    product.id, product.stock_available, quantity
                )));
            }

            let product_active = products::ActiveModel {
                id: ActiveValue::Set(product.id.clone()),
                stock_available: ActiveValue::Set(product.stock_available - quantity as i32),
                ..Default::default()
            };
            product_active.update(&db_tx).await?;

            if let Some(minor) = department.current_budget_minor {
                let department_active = departments::ActiveModel {
                    id: ActiveValue::Set(department.id.clone()),
                    current_budget_minor: ActiveValue::Set(Some(minor - total_cost.minor())),
                    ..Default::default()
                };
                department_active.update(&db_tx).await?;
            }

            let log_id = self.next_id(&db_tx, IdKind::BudgetLog).await?;
            let entry = BudgetLogEntry {
                id: log_id,
                category: LogCategory::Procurement,
                dept_id: request.dept_id.clone(),
                request_id: request.id.clone(),
                admin_id: admin_id.clone(),
                amount: total_cost,
                recorded_at: cmd.decided_at,
            };
            budget_log::ActiveModel::from(&entry).insert(&db_tx).await?;

            let request_active = requests::ActiveModel {
                id: ActiveValue::Set(request.id.clone()),
                status: ActiveValue::Set(RequestStatus::Approved.as_str().to_string()),
                total_cost_minor: ActiveValue::Set(total_cost.minor()),
                decided_at: ActiveValue::Set(Some(cmd.decided_at)),
                approval_authority: ActiveValue::Set(Some(authority_name(&official.name, &admin_id))),
                ..Default::default()
            };
            request_active.update(&db_tx).await?;

            Ok(())
        })
    }

    /// Rejects a pending request: `Pending → Rejected`.
    ///
    /// No budget, stock or ledger effect; the decision time and authority
    /// are stamped on the request. Runs under the same transactional guard
    /// as approve.
    pub async fn reject_request(&self, cmd: DecisionCmd) -> ResultEngine<()> {
        let request_id = normalize_required_id(&cmd.request_id, "request id")?;
        let admin_id = normalize_required_id(&cmd.admin_id, "admin id")?;

        with_tx!(self, |db_tx| {
            let request = self.require_request_for_update(&db_tx, &request_id).await?;
            let status = RequestStatus::try_from(request.status.as_str())?;
            if status != RequestStatus::Pending {
                return Err(EngineError::BusinessRule(format!(
                    "only pending requests can be rejected, {} is {}",
                    request.id,
                    status.as_str()
                )));
            }
            let official = self.require_official(&db_tx, &admin_id).await?;

            let request_active = requests::ActiveModel {
                id: ActiveValue::Set(request.id.clone()),
                status: ActiveValue::Set(RequestStatus::Rejected.as_str().to_string()),
                decided_at: ActiveValue::Set(Some(cmd.decided_at)),
                approval_authority: ActiveValue::Set(Some(authority_name(&official.name, &admin_id))),
                ..Default::default()
            };
            request_active.update(&db_tx).await?;

            Ok(())
        })
    }

    /// Sum of approved request totals for a department, used to derive the
    /// effective budget when no balance is stored.
    async fn approved_spend(
        &self,
        db_tx: &DatabaseTransaction,
        dept_id: &str,
    ) -> ResultEngine<Money> {
        let backend = db_tx.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(total_cost_minor), 0) AS spent \
             FROM procurement_requests \
             WHERE dept_id = ? AND status = ?",
            vec![dept_id.into(), RequestStatus::Approved.as_str().into()],
        );
        let row = db_tx.query_one(stmt).await?;
        let minor = row.and_then(|r| r.try_get("", "spent").ok()).unwrap_or(0);
        Ok(Money::new(minor))
    }
}

fn authority_name(official_name: &str, admin_id: &str) -> String {
    let name = official_name.trim();
    if name.is_empty() {
        admin_id.to_string()
    } else {
        name.to_string()
    }
}
