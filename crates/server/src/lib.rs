use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod export;
mod ledger;
mod registry;
mod requests;
mod server;
mod statistics;

pub mod types {
    pub mod request {
        pub use api_types::request::{
            Decision, RequestCreated, RequestListQuery, RequestListResponse, RequestNew,
            RequestView,
        };
    }

    pub mod ledger {
        pub use api_types::ledger::{LedgerEntryView, LedgerQuery, LedgerResponse};
    }

    pub mod registry {
        pub use api_types::registry::{
            Blacklist, DepartmentNew, EntityCreated, OfficialNew, ProductNew, Restock, VendorNew,
        };
    }

    pub mod stats {
        pub use api_types::stats::{
            CategorySpend, DashboardMetrics, DepartmentKpi, VendorPerformance,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::BusinessRule(_)
        | EngineError::InsufficientFunds(_)
        | EngineError::InsufficientStock(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
