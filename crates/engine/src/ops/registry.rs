//! Master-data creation and maintenance.
//!
//! These are the simple inserts feeding the request state machine:
//! departments, vendors, products and officials, plus vendor blacklisting
//! and product restocking. Generated ids come from the sequencer; explicit
//! ids are accepted but must be free.

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    Department, EngineError, Official, Product, ResultEngine, Vendor, departments,
    NewDepartmentCmd, NewOfficialCmd, NewProductCmd, NewVendorCmd, officials, products,
    sequences::IdKind, vendors,
};

use super::{
    Engine, normalize_optional_text, normalize_required_id, normalize_required_text, with_tx,
};

/// Generates an `ensure_*_id_free` method for an entity.
macro_rules! impl_ensure_id_free {
    ($fn_name:ident, $module:ident, $label:literal) => {
        async fn $fn_name(
            &self,
            db: &sea_orm::DatabaseTransaction,
            id: &str,
        ) -> ResultEngine<()> {
            if $module::Entity::find_by_id(id.to_string())
                .one(db)
                .await?
                .is_some()
            {
                return Err(EngineError::BusinessRule(format!(
                    concat!($label, " {} already exists"),
                    id
                )));
            }
            Ok(())
        }
    };
}

impl Engine {
    impl_ensure_id_free!(ensure_department_id_free, departments, "department");
    impl_ensure_id_free!(ensure_vendor_id_free, vendors, "vendor");
    impl_ensure_id_free!(ensure_product_id_free, products, "product");
    impl_ensure_id_free!(ensure_official_id_free, officials, "official");

    /// Creates a department and returns its id.
    ///
    /// The stored balance defaults to the allocation; with
    /// [`NewDepartmentCmd::derived_budget`] no balance is stored at all and
    /// the effective budget is derived from approved spend at approval time.
    pub async fn create_department(&self, cmd: NewDepartmentCmd) -> ResultEngine<String> {
        let name = normalize_required_text(&cmd.name, "department name")?;
        let email = normalize_required_text(&cmd.email, "department email")?;
        if cmd.budget_allocation.is_negative() {
            return Err(EngineError::Validation(
                "budget allocation must not be negative".to_string(),
            ));
        }
        if cmd.current_budget.is_some_and(|b| b.is_negative()) {
            return Err(EngineError::Validation(
                "current budget must not be negative".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let id = match &cmd.id {
                Some(id) => {
                    let id = normalize_required_id(id, "department id")?;
                    self.ensure_department_id_free(&db_tx, &id).await?;
                    id
                }
                None => self.next_id(&db_tx, IdKind::Department).await?,
            };

            let current_budget = if cmd.derived_budget {
                None
            } else {
                Some(cmd.current_budget.unwrap_or(cmd.budget_allocation))
            };

            let department = Department {
                id: id.clone(),
                name,
                location: normalize_optional_text(cmd.location.as_deref()),
                budget_allocation: cmd.budget_allocation,
                current_budget,
                email,
                region: normalize_optional_text(cmd.region.as_deref()),
                created_at: cmd.created_at,
            };
            departments::ActiveModel::from(&department).insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Creates a vendor and returns its id.
    pub async fn create_vendor(&self, cmd: NewVendorCmd) -> ResultEngine<String> {
        let company = normalize_required_text(&cmd.company, "vendor company")?;
        let category = normalize_required_text(&cmd.category, "vendor category")?;

        with_tx!(self, |db_tx| {
            let id = match &cmd.id {
                Some(id) => {
                    let id = normalize_required_id(id, "vendor id")?;
                    self.ensure_vendor_id_free(&db_tx, &id).await?;
                    id
                }
                None => self.next_id(&db_tx, IdKind::Vendor).await?,
            };

            let vendor = Vendor {
                id: id.clone(),
                company,
                category,
                country: normalize_optional_text(cmd.country.as_deref()),
                email: normalize_optional_text(cmd.email.as_deref()),
                phone: normalize_optional_text(cmd.phone.as_deref()),
                blacklisted: false,
                contract_expiry: cmd.contract_expiry,
                created_at: cmd.created_at,
            };
            vendors::ActiveModel::from(&vendor).insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Creates a product linked to an existing vendor and returns its id.
    pub async fn create_product(&self, cmd: NewProductCmd) -> ResultEngine<String> {
        let name = normalize_required_text(&cmd.name, "product name")?;
        let category = normalize_required_text(&cmd.category, "product category")?;
        let vendor_id = normalize_required_id(&cmd.vendor_id, "vendor id")?;
        if cmd.unit_cost.is_negative() {
            return Err(EngineError::Validation(
                "unit cost must not be negative".to_string(),
            ));
        }
        let stock_available = i32::try_from(cmd.stock_available)
            .map_err(|_| EngineError::Validation("stock quantity too large".to_string()))?;

        with_tx!(self, |db_tx| {
            self.require_vendor(&db_tx, &vendor_id).await?;
            let id = match &cmd.id {
                Some(id) => {
                    let id = normalize_required_id(id, "product id")?;
                    self.ensure_product_id_free(&db_tx, &id).await?;
                    id
                }
                None => self.next_id(&db_tx, IdKind::Product).await?,
            };

            let product = Product {
                id: id.clone(),
                name,
                category,
                unit_cost: cmd.unit_cost,
                manufacturer: normalize_optional_text(cmd.manufacturer.as_deref()),
                country_of_origin: normalize_optional_text(cmd.country_of_origin.as_deref()),
                imported: cmd.imported,
                stock_available,
                vendor_id: Some(vendor_id),
                created_at: cmd.created_at,
            };
            products::ActiveModel::from(&product).insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Creates a ministry official and returns its id.
    pub async fn create_official(&self, cmd: NewOfficialCmd) -> ResultEngine<String> {
        let name = normalize_required_text(&cmd.name, "official name")?;
        let email = normalize_required_text(&cmd.email, "official email")?;

        with_tx!(self, |db_tx| {
            let id = match &cmd.id {
                Some(id) => {
                    let id = normalize_required_id(id, "official id")?;
                    self.ensure_official_id_free(&db_tx, &id).await?;
                    id
                }
                None => self.next_id(&db_tx, IdKind::Official).await?,
            };

            let official = Official {
                id: id.clone(),
                name,
                role: normalize_optional_text(cmd.role.as_deref()),
                email,
                phone: normalize_optional_text(cmd.phone.as_deref()),
                created_at: cmd.created_at,
            };
            officials::ActiveModel::from(&official).insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Fetches a department by id.
    pub async fn get_department(&self, dept_id: &str) -> ResultEngine<Department> {
        let dept_id = normalize_required_id(dept_id, "department id")?;
        with_tx!(self, |db_tx| {
            let model = self.require_department(&db_tx, &dept_id).await?;
            Department::try_from(model)
        })
    }

    /// Fetches a product by id.
    pub async fn get_product(&self, item_id: &str) -> ResultEngine<Product> {
        let item_id = normalize_required_id(item_id, "product id")?;
        with_tx!(self, |db_tx| {
            let model = self.require_product(&db_tx, &item_id).await?;
            Product::try_from(model)
        })
    }

    /// Fetches a vendor by id.
    pub async fn get_vendor(&self, vendor_id: &str) -> ResultEngine<Vendor> {
        let vendor_id = normalize_required_id(vendor_id, "vendor id")?;
        with_tx!(self, |db_tx| {
            let model = self.require_vendor(&db_tx, &vendor_id).await?;
            Vendor::try_from(model)
        })
    }

    /// Marks a vendor as blacklisted. Requires a known official.
    pub async fn blacklist_vendor(&self, vendor_id: &str, admin_id: &str) -> ResultEngine<()> {
        let vendor_id = normalize_required_id(vendor_id, "vendor id")?;
        let admin_id = normalize_required_id(admin_id, "admin id")?;

        with_tx!(self, |db_tx| {
            self.require_official(&db_tx, &admin_id).await?;
            let vendor = self.require_vendor_for_update(&db_tx, &vendor_id).await?;

            let active = vendors::ActiveModel {
                id: ActiveValue::Set(vendor.id),
                blacklisted: ActiveValue::Set(true),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Increases a product's stock by `quantity`.
    pub async fn restock_product(&self, item_id: &str, quantity: u32) -> ResultEngine<()> {
        let item_id = normalize_required_id(item_id, "product id")?;
        if quantity == 0 {
            return Err(EngineError::Validation(
                "restock quantity must be a positive integer".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let product = self.require_product_for_update(&db_tx, &item_id).await?;
            let new_stock = i32::try_from(quantity)
                .ok()
                .and_then(|qty| product.stock_available.checked_add(qty))
                .ok_or_else(|| {
                    EngineError::Validation("stock quantity too large".to_string())
                })?;

            let active = products::ActiveModel {
                id: ActiveValue::Set(product.id),
                stock_available: ActiveValue::Set(new_stock),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }
}
