//! Master-data API endpoints

use api_types::registry::{
    Blacklist, DepartmentNew, EntityCreated, OfficialNew, ProductNew, Restock, VendorNew,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use engine::{Money, NewDepartmentCmd, NewOfficialCmd, NewProductCmd, NewVendorCmd};

use crate::{ServerError, server::ServerState};

/// Handle requests for creating a new department
pub async fn department_new(
    State(state): State<ServerState>,
    Json(payload): Json<DepartmentNew>,
) -> Result<Json<EntityCreated>, ServerError> {
    let budget_allocation: Money = payload.budget_allocation.parse()?;
    let mut cmd = NewDepartmentCmd::new(payload.name, payload.email, budget_allocation, Utc::now());
    if let Some(id) = payload.id {
        cmd = cmd.id(id);
    }
    if let Some(location) = payload.location {
        cmd = cmd.location(location);
    }
    if let Some(current) = payload.current_budget {
        cmd = cmd.current_budget(current.parse()?);
    }
    if let Some(region) = payload.region {
        cmd = cmd.region(region);
    }

    let id = state.engine.create_department(cmd).await?;
    Ok(Json(EntityCreated { id }))
}

/// Handle requests for creating a new vendor
pub async fn vendor_new(
    State(state): State<ServerState>,
    Json(payload): Json<VendorNew>,
) -> Result<Json<EntityCreated>, ServerError> {
    let mut cmd = NewVendorCmd::new(payload.company, payload.category, Utc::now());
    if let Some(id) = payload.id {
        cmd = cmd.id(id);
    }
    if let Some(country) = payload.country {
        cmd = cmd.country(country);
    }
    if let Some(email) = payload.email {
        cmd = cmd.email(email);
    }
    if let Some(phone) = payload.phone {
        cmd = cmd.phone(phone);
    }
    if let Some(expiry) = payload.contract_expiry {
        cmd = cmd.contract_expiry(expiry);
    }

    let id = state.engine.create_vendor(cmd).await?;
    Ok(Json(EntityCreated { id }))
}

/// Blacklist a vendor; requires a known official
pub async fn vendor_blacklist(
    State(state): State<ServerState>,
    Path(vendor_id): Path<String>,
    Json(payload): Json<Blacklist>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .blacklist_vendor(&vendor_id, &payload.admin_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for creating a new product
pub async fn product_new(
    State(state): State<ServerState>,
    Json(payload): Json<ProductNew>,
) -> Result<Json<EntityCreated>, ServerError> {
    let unit_cost: Money = payload.unit_cost.parse()?;
    let mut cmd = NewProductCmd::new(
        payload.name,
        payload.category,
        payload.vendor_id,
        unit_cost,
        Utc::now(),
    )
    .stock_available(payload.stock_available);
    if let Some(id) = payload.id {
        cmd = cmd.id(id);
    }
    if let Some(manufacturer) = payload.manufacturer {
        cmd = cmd.manufacturer(manufacturer);
    }
    if let Some(origin) = payload.country_of_origin {
        cmd = cmd.country_of_origin(origin);
    }
    if payload.imported {
        cmd = cmd.imported();
    }

    let id = state.engine.create_product(cmd).await?;
    Ok(Json(EntityCreated { id }))
}

/// Increase a product's stock
pub async fn product_restock(
    State(state): State<ServerState>,
    Path(item_id): Path<String>,
    Json(payload): Json<Restock>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .restock_product(&item_id, payload.quantity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for creating a new ministry official
pub async fn official_new(
    State(state): State<ServerState>,
    Json(payload): Json<OfficialNew>,
) -> Result<Json<EntityCreated>, ServerError> {
    let mut cmd = NewOfficialCmd::new(payload.name, payload.email, Utc::now());
    if let Some(id) = payload.id {
        cmd = cmd.id(id);
    }
    if let Some(role) = payload.role {
        cmd = cmd.role(role);
    }
    if let Some(phone) = payload.phone {
        cmd = cmd.phone(phone);
    }

    let id = state.engine.create_official(cmd).await?;
    Ok(Json(EntityCreated { id }))
}
