//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Quaestor:
//!
//! - `departments`: budget-holding units raising requests
//! - `vendors`: suppliers, with a blacklist flag
//! - `products`: purchasable items with stock and unit cost
//! - `officials`: ministry officials deciding on requests
//! - `procurement_requests`: the request lifecycle rows
//! - `budget_log`: append-only ledger of budget movements
//! - `sequences`: per-entity counters behind the human-readable ids
//!
//! All monetary columns hold integer minor units at 8 decimal places.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    Name,
    Location,
    BudgetAllocationMinor,
    CurrentBudgetMinor,
    Email,
    Region,
    CreatedAt,
}

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
    Company,
    Category,
    Country,
    Email,
    Phone,
    Blacklisted,
    ContractExpiry,
    CreatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Category,
    UnitCostMinor,
    Manufacturer,
    CountryOfOrigin,
    Imported,
    StockAvailable,
    VendorId,
    CreatedAt,
}

#[derive(Iden)]
enum Officials {
    Table,
    Id,
    Name,
    Role,
    Email,
    Phone,
    CreatedAt,
}

#[derive(Iden)]
enum ProcurementRequests {
    Table,
    Id,
    DeptId,
    ItemId,
    VendorId,
    Quantity,
    TotalCostMinor,
    Status,
    RequestedAt,
    ApprovalAuthority,
    DecidedAt,
}

#[derive(Iden)]
enum BudgetLog {
    Table,
    Id,
    Category,
    DeptId,
    RequestId,
    AdminId,
    AmountMinor,
    RecordedAt,
}

#[derive(Iden)]
enum Sequences {
    Table,
    Kind,
    LastValue,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Departments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(ColumnDef::new(Departments::Location).string())
                    .col(
                        ColumnDef::new(Departments::BudgetAllocationMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Departments::CurrentBudgetMinor).big_integer())
                    .col(ColumnDef::new(Departments::Email).string().not_null())
                    .col(ColumnDef::new(Departments::Region).string())
                    .col(
                        ColumnDef::new(Departments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Vendors
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vendors::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vendors::Company).string().not_null())
                    .col(ColumnDef::new(Vendors::Category).string().not_null())
                    .col(ColumnDef::new(Vendors::Country).string())
                    .col(ColumnDef::new(Vendors::Email).string())
                    .col(ColumnDef::new(Vendors::Phone).string())
                    .col(
                        ColumnDef::new(Vendors::Blacklisted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Vendors::ContractExpiry).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Products
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Category).string().not_null())
                    .col(
                        ColumnDef::new(Products::UnitCostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Products::Manufacturer).string())
                    .col(ColumnDef::new(Products::CountryOfOrigin).string())
                    .col(
                        ColumnDef::new(Products::Imported)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Products::StockAvailable)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Products::VendorId).string())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-vendor_id")
                            .from(Products::Table, Products::VendorId)
                            .to(Vendors::Table, Vendors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-vendor_id")
                    .table(Products::Table)
                    .col(Products::VendorId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Officials
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Officials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Officials::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Officials::Name).string().not_null())
                    .col(ColumnDef::new(Officials::Role).string())
                    .col(ColumnDef::new(Officials::Email).string().not_null())
                    .col(ColumnDef::new(Officials::Phone).string())
                    .col(
                        ColumnDef::new(Officials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Procurement requests
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ProcurementRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProcurementRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProcurementRequests::DeptId).string().not_null())
                    .col(ColumnDef::new(ProcurementRequests::ItemId).string().not_null())
                    .col(
                        ColumnDef::new(ProcurementRequests::VendorId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProcurementRequests::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProcurementRequests::TotalCostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ProcurementRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(ProcurementRequests::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProcurementRequests::ApprovalAuthority).string())
                    .col(ColumnDef::new(ProcurementRequests::DecidedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-procurement_requests-dept_id")
                            .from(ProcurementRequests::Table, ProcurementRequests::DeptId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-procurement_requests-item_id")
                            .from(ProcurementRequests::Table, ProcurementRequests::ItemId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-procurement_requests-dept_id")
                    .table(ProcurementRequests::Table)
                    .col(ProcurementRequests::DeptId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-procurement_requests-status")
                    .table(ProcurementRequests::Table)
                    .col(ProcurementRequests::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Budget log
        // ───────────────────────────────────────────────────────────────────
        // No foreign key on request_id: ledger entries outlive cancelled
        // requests.
        manager
            .create_table(
                Table::create()
                    .table(BudgetLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetLog::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetLog::Category).string().not_null())
                    .col(ColumnDef::new(BudgetLog::DeptId).string().not_null())
                    .col(ColumnDef::new(BudgetLog::RequestId).string().not_null())
                    .col(ColumnDef::new(BudgetLog::AdminId).string().not_null())
                    .col(
                        ColumnDef::new(BudgetLog::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BudgetLog::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_log-dept_id")
                    .table(BudgetLog::Table)
                    .col(BudgetLog::DeptId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Sequences
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sequences::Kind)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sequences::LastValue)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProcurementRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Officials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        Ok(())
    }
}
