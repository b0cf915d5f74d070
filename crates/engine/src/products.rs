//! Product master data.
//!
//! `stock_available` is the inventory ledger: decremented on request
//! approval, incremented on cancellation and restock. It never goes
//! negative.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, Money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit_cost: Money,
    pub manufacturer: Option<String>,
    pub country_of_origin: Option<String>,
    pub imported: bool,
    pub stock_available: i32,
    /// Supplying vendor; requests cannot be raised against a product without
    /// one. Nullable for the benefit of pre-existing data.
    pub vendor_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit_cost_minor: i64,
    pub manufacturer: Option<String>,
    pub country_of_origin: Option<String>,
    pub imported: bool,
    pub stock_available: i32,
    pub vendor_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendors,
    #[sea_orm(has_many = "super::requests::Entity")]
    Requests,
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl Related<super::requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.clone()),
            name: ActiveValue::Set(product.name.clone()),
            category: ActiveValue::Set(product.category.clone()),
            unit_cost_minor: ActiveValue::Set(product.unit_cost.minor()),
            manufacturer: ActiveValue::Set(product.manufacturer.clone()),
            country_of_origin: ActiveValue::Set(product.country_of_origin.clone()),
            imported: ActiveValue::Set(product.imported),
            stock_available: ActiveValue::Set(product.stock_available),
            vendor_id: ActiveValue::Set(product.vendor_id.clone()),
            created_at: ActiveValue::Set(product.created_at),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            category: model.category,
            unit_cost: Money::new(model.unit_cost_minor),
            manufacturer: model.manufacturer,
            country_of_origin: model.country_of_origin,
            imported: model.imported,
            stock_available: model.stock_available,
            vendor_id: model.vendor_id,
            created_at: model.created_at,
        })
    }
}
