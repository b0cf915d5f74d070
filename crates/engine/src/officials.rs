//! Ministry officials: the people allowed to decide on requests.
//!
//! An admin id is trusted as given; the engine only resolves it to a display
//! name for the approval authority field.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Official {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "officials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Official> for ActiveModel {
    fn from(official: &Official) -> Self {
        Self {
            id: ActiveValue::Set(official.id.clone()),
            name: ActiveValue::Set(official.name.clone()),
            role: ActiveValue::Set(official.role.clone()),
            email: ActiveValue::Set(official.email.clone()),
            phone: ActiveValue::Set(official.phone.clone()),
            created_at: ActiveValue::Set(official.created_at),
        }
    }
}

impl TryFrom<Model> for Official {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            role: model.role,
            email: model.email,
            phone: model.phone,
            created_at: model.created_at,
        })
    }
}
