use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    CreateRequestCmd, EngineError, Money, ProcurementRequest, RequestStatus, ResultEngine,
    requests, sequences::IdKind,
};

use super::super::{Engine, normalize_required_id, with_tx};

impl Engine {
    /// Creates a procurement request in `Pending` state and returns its id.
    ///
    /// The product row is read for update and its linked vendor checked
    /// against the blacklist before the id is drawn from the sequencer, all
    /// inside one transaction; a failure at any point leaves no trace.
    ///
    /// The total cost is fixed here from the current unit cost; approval
    /// does not reprice a non-zero total.
    pub async fn create_request(&self, cmd: CreateRequestCmd) -> ResultEngine<String> {
        let dept_id = normalize_required_id(&cmd.dept_id, "department id")?;
        let item_id = normalize_required_id(&cmd.item_id, "product id")?;
        if cmd.quantity == 0 {
            return Err(EngineError::Validation(
                "quantity must be a positive integer".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_department(&db_tx, &dept_id).await?;

            let product = self.require_product_for_update(&db_tx, &item_id).await?;
            let vendor_id = product
                .vendor_id
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
                .ok_or_else(|| {
                    EngineError::NotFound(format!("vendor for product {item_id}"))
                })?;

            let vendor = self.require_vendor_for_update(&db_tx, &vendor_id).await?;
            if vendor.blacklisted {
                return Err(EngineError::BusinessRule(format!(
                    "vendor {} is blacklisted",
                    vendor.id
                )));
            }

            let id = self.next_id(&db_tx, IdKind::Request).await?;
            let total_cost = Money::new(product.unit_cost_minor)
                .checked_mul_quantity(cmd.quantity)
                .ok_or_else(|| EngineError::Validation("total cost too large".to_string()))?;

            let request = ProcurementRequest {
                id: id.clone(),
                dept_id,
                item_id,
                vendor_id,
                quantity: cmd.quantity,
                total_cost,
                status: RequestStatus::Pending,
                requested_at: cmd.requested_at,
                approval_authority: None,
                decided_at: None,
            };
            requests::ActiveModel::from(&request).insert(&db_tx).await?;
            Ok(id)
        })
    }
}
