use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{ledger, registry, requests, statistics};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/requests", post(requests::create).get(requests::list))
        .route("/requests/export", get(requests::export_csv))
        .route("/requests/{id}/approve", post(requests::approve))
        .route("/requests/{id}/reject", post(requests::reject))
        .route("/requests/{id}/cancel", post(requests::cancel))
        .route("/ledger", get(ledger::list))
        .route("/ledger/export", get(ledger::export_csv))
        .route("/departments", post(registry::department_new))
        .route("/vendors", post(registry::vendor_new))
        .route("/vendors/{id}/blacklist", post(registry::vendor_blacklist))
        .route("/products", post(registry::product_new))
        .route("/products/{id}/restock", post(registry::product_restock))
        .route("/officials", post(registry::official_new))
        .route("/dashboard", get(statistics::dashboard))
        .route(
            "/analytics/departments",
            get(statistics::department_kpis),
        )
        .route("/analytics/categories", get(statistics::category_spend))
        .route("/analytics/vendors", get(statistics::vendor_performance))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
