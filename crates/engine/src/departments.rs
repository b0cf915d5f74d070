//! Department master data.
//!
//! A department owns a budget: `budget_allocation` is the initial grant and
//! never changes after creation, while `current_budget` is the running
//! spendable balance. `current_budget` may be `None`, in which case the
//! effective balance is derived from the allocation minus approved spend.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, Money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub budget_allocation: Money,
    pub current_budget: Option<Money>,
    pub email: String,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub budget_allocation_minor: i64,
    pub current_budget_minor: Option<i64>,
    pub email: String,
    pub region: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::requests::Entity")]
    Requests,
}

impl Related<super::requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Department> for ActiveModel {
    fn from(dept: &Department) -> Self {
        Self {
            id: ActiveValue::Set(dept.id.clone()),
            name: ActiveValue::Set(dept.name.clone()),
            location: ActiveValue::Set(dept.location.clone()),
            budget_allocation_minor: ActiveValue::Set(dept.budget_allocation.minor()),
            current_budget_minor: ActiveValue::Set(dept.current_budget.map(Money::minor)),
            email: ActiveValue::Set(dept.email.clone()),
            region: ActiveValue::Set(dept.region.clone()),
            created_at: ActiveValue::Set(dept.created_at),
        }
    }
}

impl TryFrom<Model> for Department {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            location: model.location,
            budget_allocation: Money::new(model.budget_allocation_minor),
            current_budget: model.current_budget_minor.map(Money::new),
            email: model.email,
            region: model.region,
            created_at: model.created_at,
        })
    }
}
