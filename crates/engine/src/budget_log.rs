//! The budget ledger: an append-only record of budget movements.
//!
//! Entries are never updated or deleted. A `Procurement` entry carries the
//! positive approved total; a `Reversal` entry carries the negated total of
//! a cancelled approval. The signed sum per department is its net spend.
//!
//! `request_id` intentionally has no foreign key: a ledger entry outlives
//! the request it refers to once the request is cancelled.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogCategory {
    Procurement,
    Reversal,
}

impl LogCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Procurement => "Procurement",
            Self::Reversal => "Reversal",
        }
    }
}

impl TryFrom<&str> for LogCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "procurement" => Ok(Self::Procurement),
            "reversal" => Ok(Self::Reversal),
            other => Err(EngineError::Validation(format!(
                "invalid ledger category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetLogEntry {
    pub id: String,
    pub category: LogCategory,
    pub dept_id: String,
    pub request_id: String,
    pub admin_id: String,
    /// Signed: positive for procurement spend, negative for a reversal.
    pub amount: Money,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category: String,
    pub dept_id: String,
    pub request_id: String,
    pub admin_id: String,
    pub amount_minor: i64,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BudgetLogEntry> for ActiveModel {
    fn from(entry: &BudgetLogEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.clone()),
            category: ActiveValue::Set(entry.category.as_str().to_string()),
            dept_id: ActiveValue::Set(entry.dept_id.clone()),
            request_id: ActiveValue::Set(entry.request_id.clone()),
            admin_id: ActiveValue::Set(entry.admin_id.clone()),
            amount_minor: ActiveValue::Set(entry.amount.minor()),
            recorded_at: ActiveValue::Set(entry.recorded_at),
        }
    }
}

impl TryFrom<Model> for BudgetLogEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            category: LogCategory::try_from(model.category.as_str())?,
            dept_id: model.dept_id,
            request_id: model.request_id,
            admin_id: model.admin_id,
            amount: Money::new(model.amount_minor),
            recorded_at: model.recorded_at,
        })
    }
}
