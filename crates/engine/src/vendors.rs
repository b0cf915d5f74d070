//! Vendor master data.
//!
//! A blacklisted vendor cannot receive new procurement requests.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vendor {
    pub id: String,
    pub company: String,
    pub category: String,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub blacklisted: bool,
    pub contract_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub company: String,
    pub category: String,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub blacklisted: bool,
    pub contract_expiry: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vendor> for ActiveModel {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: ActiveValue::Set(vendor.id.clone()),
            company: ActiveValue::Set(vendor.company.clone()),
            category: ActiveValue::Set(vendor.category.clone()),
            country: ActiveValue::Set(vendor.country.clone()),
            email: ActiveValue::Set(vendor.email.clone()),
            phone: ActiveValue::Set(vendor.phone.clone()),
            blacklisted: ActiveValue::Set(vendor.blacklisted),
            contract_expiry: ActiveValue::Set(vendor.contract_expiry),
            created_at: ActiveValue::Set(vendor.created_at),
        }
    }
}

impl TryFrom<Model> for Vendor {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            company: model.company,
            category: model.category,
            country: model.country,
            email: model.email,
            phone: model.phone,
            blacklisted: model.blacklisted,
            contract_expiry: model.contract_expiry,
            created_at: model.created_at,
        })
    }
}
