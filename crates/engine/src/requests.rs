//! Procurement request primitives.
//!
//! A request moves `Pending → Approved | Rejected` exactly once. An approved
//! request can be cancelled, which fully reverses its effects and deletes
//! the row; only the ledger reversal entry records that it ever existed.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = EngineError;

    // Pre-existing rows are not guaranteed to be consistently cased.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::Validation(format!(
                "invalid request status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcurementRequest {
    pub id: String,
    pub dept_id: String,
    pub item_id: String,
    pub vendor_id: String,
    pub quantity: u32,
    pub total_cost: Money,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    /// Resolved official name once decided (falls back to the admin id when
    /// the name lookup fails).
    pub approval_authority: Option<String>,
    /// Decision time, set by both approve and reject.
    pub decided_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "procurement_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub dept_id: String,
    pub item_id: String,
    pub vendor_id: String,
    pub quantity: i32,
    pub total_cost_minor: i64,
    pub status: String,
    pub requested_at: DateTimeUtc,
    pub approval_authority: Option<String>,
    pub decided_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DeptId",
        to = "super::departments::Column::Id"
    )]
    Departments,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ItemId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::officials::Entity",
        from = "Column::ApprovalAuthority",
        to = "super::officials::Column::Id"
    )]
    Officials,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::officials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Officials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ProcurementRequest> for ActiveModel {
    fn from(request: &ProcurementRequest) -> Self {
        Self {
            id: ActiveValue::Set(request.id.clone()),
            dept_id: ActiveValue::Set(request.dept_id.clone()),
            item_id: ActiveValue::Set(request.item_id.clone()),
            vendor_id: ActiveValue::Set(request.vendor_id.clone()),
            quantity: ActiveValue::Set(request.quantity as i32),
            total_cost_minor: ActiveValue::Set(request.total_cost.minor()),
            status: ActiveValue::Set(request.status.as_str().to_string()),
            requested_at: ActiveValue::Set(request.requested_at),
            approval_authority: ActiveValue::Set(request.approval_authority.clone()),
            decided_at: ActiveValue::Set(request.decided_at),
        }
    }
}

impl TryFrom<Model> for ProcurementRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(model.quantity).map_err(|_| {
            EngineError::Validation(format!("invalid quantity on request {}", model.id))
        })?;
        Ok(Self {
            id: model.id,
            dept_id: model.dept_id,
            item_id: model.item_id,
            vendor_id: model.vendor_id,
            quantity,
            total_cost: Money::new(model.total_cost_minor),
            status: RequestStatus::try_from(model.status.as_str())?,
            requested_at: model.requested_at,
            approval_authority: model.approval_authority,
            decided_at: model.decided_at,
        })
    }
}
