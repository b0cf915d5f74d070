//! Command structs for engine operations.
//!
//! These types group parameters for write operations (request transitions
//! and master-data creation), keeping call sites readable and avoiding long
//! argument lists. Timestamps are always passed in by the caller.

use chrono::{DateTime, Utc};

use crate::Money;

/// Create a procurement request.
#[derive(Clone, Debug)]
pub struct CreateRequestCmd {
    pub dept_id: String,
    pub item_id: String,
    pub quantity: u32,
    pub requested_at: DateTime<Utc>,
}

impl CreateRequestCmd {
    #[must_use]
    pub fn new(
        dept_id: impl Into<String>,
        item_id: impl Into<String>,
        quantity: u32,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            dept_id: dept_id.into(),
            item_id: item_id.into(),
            quantity,
            requested_at,
        }
    }
}

/// Decide on a request: approve, reject or cancel.
#[derive(Clone, Debug)]
pub struct DecisionCmd {
    pub request_id: String,
    pub admin_id: String,
    pub decided_at: DateTime<Utc>,
}

impl DecisionCmd {
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        admin_id: impl Into<String>,
        decided_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            admin_id: admin_id.into(),
            decided_at,
        }
    }
}

/// Create a department.
#[derive(Clone, Debug)]
pub struct NewDepartmentCmd {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub location: Option<String>,
    pub budget_allocation: Money,
    /// Explicit starting balance; defaults to the allocation.
    pub current_budget: Option<Money>,
    /// Store no balance at all: the effective budget is then derived from
    /// the allocation minus approved spend.
    pub derived_budget: bool,
    pub email: String,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewDepartmentCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        budget_allocation: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: None,
            budget_allocation,
            current_budget: None,
            derived_budget: false,
            email: email.into(),
            region: None,
            created_at,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn current_budget(mut self, current_budget: Money) -> Self {
        self.current_budget = Some(current_budget);
        self
    }

    #[must_use]
    pub fn derived_budget(mut self) -> Self {
        self.derived_budget = true;
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Create a vendor.
#[derive(Clone, Debug)]
pub struct NewVendorCmd {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    pub company: String,
    pub category: String,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contract_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewVendorCmd {
    #[must_use]
    pub fn new(
        company: impl Into<String>,
        category: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            company: company.into(),
            category: category.into(),
            country: None,
            email: None,
            phone: None,
            contract_expiry: None,
            created_at,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn contract_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.contract_expiry = Some(expiry);
        self
    }
}

/// Create a product.
#[derive(Clone, Debug)]
pub struct NewProductCmd {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub unit_cost: Money,
    pub manufacturer: Option<String>,
    pub country_of_origin: Option<String>,
    pub imported: bool,
    pub stock_available: u32,
    pub vendor_id: String,
    pub created_at: DateTime<Utc>,
}

impl NewProductCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        vendor_id: impl Into<String>,
        unit_cost: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            unit_cost,
            manufacturer: None,
            country_of_origin: None,
            imported: false,
            stock_available: 0,
            vendor_id: vendor_id.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn country_of_origin(mut self, origin: impl Into<String>) -> Self {
        self.country_of_origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn imported(mut self) -> Self {
        self.imported = true;
        self
    }

    #[must_use]
    pub fn stock_available(mut self, stock: u32) -> Self {
        self.stock_available = stock;
        self
    }
}

/// Create a ministry official.
#[derive(Clone, Debug)]
pub struct NewOfficialCmd {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub role: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewOfficialCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            role: None,
            email: email.into(),
            phone: None,
            created_at,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}
