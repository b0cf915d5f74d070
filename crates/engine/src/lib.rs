pub use budget_log::{BudgetLogEntry, LogCategory};
pub use commands::{
    CreateRequestCmd, DecisionCmd, NewDepartmentCmd, NewOfficialCmd, NewProductCmd, NewVendorCmd,
};
pub use departments::Department;
pub use error::EngineError;
pub use money::{FRACTION_DIGITS, Money};
pub use officials::Official;
pub use ops::{
    CategorySpendRow, DashboardMetrics, DepartmentKpiRow, Engine, EngineBuilder, LedgerFilter,
    RequestListFilter, SortOrder, VendorPerformanceRow,
};
pub use products::Product;
pub use requests::{ProcurementRequest, RequestStatus};
pub use sequences::IdKind;
pub use vendors::Vendor;

mod budget_log;
mod commands;
mod departments;
mod error;
mod money;
mod officials;
mod ops;
mod products;
mod requests;
mod sequences;
mod vendors;

type ResultEngine<T> = Result<T, EngineError>;
