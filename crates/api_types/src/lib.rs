use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod request {
    use super::*;

    /// Request body for creating a procurement request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestNew {
        pub dept_id: String,
        pub item_id: String,
        pub quantity: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestCreated {
        pub request_id: String,
    }

    /// Request body for approve/reject/cancel.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Decision {
        pub admin_id: String,
    }

    /// A request joined with its resolved approver name.
    ///
    /// Monetary values are fixed 8-decimal strings (`"50.00000000"`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestView {
        pub request_id: String,
        pub dept_id: String,
        pub item_id: String,
        pub vendor_id: String,
        pub quantity: u32,
        pub total_cost: String,
        pub status: String,
        pub requested_at: DateTime<Utc>,
        pub approved_by: Option<String>,
        pub decided_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestListResponse {
        pub requests: Vec<RequestView>,
    }

    /// Query parameters accepted by the request listing.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RequestListQuery {
        /// Free-text match against id, department and status.
        pub q: Option<String>,
        pub status: Option<String>,
        pub dept: Option<String>,
        /// `asc` or `desc` (default).
        pub sort: Option<String>,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryView {
        pub log_id: String,
        pub category: String,
        pub dept_id: String,
        pub request_id: String,
        pub admin_id: String,
        /// Signed fixed 8-decimal string; negative for reversals.
        pub amount: String,
        pub recorded_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerResponse {
        pub entries: Vec<LedgerEntryView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQuery {
        pub dept: Option<String>,
        pub request: Option<String>,
        pub admin: Option<String>,
        pub category: Option<String>,
    }
}

pub mod registry {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntityCreated {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepartmentNew {
        pub id: Option<String>,
        pub name: String,
        pub location: Option<String>,
        /// Fixed 8-decimal string.
        pub budget_allocation: String,
        /// Defaults to the allocation when absent.
        pub current_budget: Option<String>,
        pub email: String,
        pub region: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorNew {
        pub id: Option<String>,
        pub company: String,
        pub category: String,
        pub country: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub contract_expiry: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProductNew {
        pub id: Option<String>,
        pub name: String,
        pub category: String,
        /// Fixed 8-decimal string.
        pub unit_cost: String,
        pub manufacturer: Option<String>,
        pub country_of_origin: Option<String>,
        #[serde(default)]
        pub imported: bool,
        #[serde(default)]
        pub stock_available: u32,
        pub vendor_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfficialNew {
        pub id: Option<String>,
        pub name: String,
        pub role: Option<String>,
        pub email: String,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Restock {
        pub quantity: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Blacklist {
        pub admin_id: String,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardMetrics {
        pub departments: u64,
        pub vendors: u64,
        pub products: u64,
        pub requests: u64,
        pub approved_requests: u64,
        pub pending_requests: u64,
        pub rejected_requests: u64,
        pub total_department_budget: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepartmentKpi {
        pub dept_id: String,
        pub name: String,
        pub total_requests: u64,
        pub approved: u64,
        pub rejected: u64,
        pub pending: u64,
        pub net_spend: String,
        pub avg_request_cost: Option<String>,
        pub max_request_cost: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpend {
        pub category: String,
        pub requests: u64,
        pub approved_spend: String,
        pub avg_unit_cost: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorPerformance {
        pub vendor_id: String,
        pub company: String,
        pub product_count: u64,
        pub total_spend: String,
    }
}
