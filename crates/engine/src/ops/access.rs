use sea_orm::{DatabaseTransaction, QuerySelect, prelude::*};

use crate::{EngineError, ResultEngine, departments, officials, products, requests, vendors};

use super::Engine;

/// Generates plain and `FOR UPDATE` fetch-or-fail methods for an entity.
///
/// The locked variant is used on every write path so that concurrent
/// transitions touching the same row serialize; SQLite ignores the lock
/// clause and relies on its single-writer transactions instead.
macro_rules! impl_require_row {
    ($fn_name:ident, $locked_fn_name:ident, $module:ident, $label:literal) => {
        pub(super) async fn $fn_name(
            &self,
            db: &DatabaseTransaction,
            id: &str,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!(concat!($label, " {}"), id)))
        }

        pub(super) async fn $locked_fn_name(
            &self,
            db: &DatabaseTransaction,
            id: &str,
        ) -> ResultEngine<$module::Model> {
            $module::Entity::find_by_id(id.to_string())
                .lock_exclusive()
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!(concat!($label, " {}"), id)))
        }
    };
}

impl Engine {
    impl_require_row!(
        require_department,
        require_department_for_update,
        departments,
        "department"
    );

    impl_require_row!(require_vendor, require_vendor_for_update, vendors, "vendor");

    impl_require_row!(
        require_product,
        require_product_for_update,
        products,
        "product"
    );

    impl_require_row!(
        require_request,
        require_request_for_update,
        requests,
        "request"
    );

    /// Resolves an admin id to a ministry official.
    ///
    /// An unknown admin is a business-rule failure, not a lookup failure:
    /// the id was supplied as an authority claim, not as a reference.
    pub(super) async fn require_official(
        &self,
        db: &DatabaseTransaction,
        admin_id: &str,
    ) -> ResultEngine<officials::Model> {
        officials::Entity::find_by_id(admin_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::BusinessRule(format!("unknown official {admin_id}")))
    }
}
