use chrono::Utc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use engine::{
    CreateRequestCmd, DecisionCmd, Engine, Money, NewDepartmentCmd, NewOfficialCmd, NewProductCmd,
    NewVendorCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1);
    let db = Database::connect(opts).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

async fn seed_two_departments(engine: &Engine) -> (String, String, String) {
    let transport = engine
        .create_department(NewDepartmentCmd::new(
            "Transport",
            "transport@gov.example",
            money("500.00"),
            Utc::now(),
        ))
        .await
        .unwrap();
    let health = engine
        .create_department(NewDepartmentCmd::new(
            "Health",
            "health@gov.example",
            money("500.00"),
            Utc::now(),
        ))
        .await
        .unwrap();
    let vendor = engine
        .create_vendor(NewVendorCmd::new("Northway Ltd", "Vehicles", Utc::now()))
        .await
        .unwrap();
    let tyre = engine
        .create_product(
            NewProductCmd::new("Tyre", "Vehicles", &vendor, money("25.00"), Utc::now())
                .stock_available(40),
        )
        .await
        .unwrap();
    let admin = engine
        .create_official(NewOfficialCmd::new("Ira Lane", "ira@gov.example", Utc::now()))
        .await
        .unwrap();

    let first = engine
        .create_request(CreateRequestCmd::new(&transport, &tyre, 4, Utc::now()))
        .await
        .unwrap();
    engine
        .approve_request(DecisionCmd::new(&first, &admin, Utc::now()))
        .await
        .unwrap();
    let second = engine
        .create_request(CreateRequestCmd::new(&transport, &tyre, 2, Utc::now()))
        .await
        .unwrap();
    engine
        .reject_request(DecisionCmd::new(&second, &admin, Utc::now()))
        .await
        .unwrap();
    engine
        .create_request(CreateRequestCmd::new(&health, &tyre, 1, Utc::now()))
        .await
        .unwrap();

    (transport, health, vendor)
}

#[tokio::test]
async fn dashboard_counts_and_budget_total() {
    let (engine, _db) = engine_with_db().await;
    seed_two_departments(&engine).await;

    let metrics = engine.dashboard_metrics().await.unwrap();
    assert_eq!(metrics.departments, 2);
    assert_eq!(metrics.vendors, 1);
    assert_eq!(metrics.products, 1);
    assert_eq!(metrics.requests, 3);
    assert_eq!(metrics.approved_requests, 1);
    assert_eq!(metrics.rejected_requests, 1);
    assert_eq!(metrics.pending_requests, 1);
    // 500 - 100 spent, plus the untouched 500.
    assert_eq!(metrics.total_department_budget, money("900.00"));
}

#[tokio::test]
async fn department_kpis_aggregate_per_department() {
    let (engine, _db) = engine_with_db().await;
    let (transport, health, _) = seed_two_departments(&engine).await;

    let kpis = engine.department_kpis().await.unwrap();
    assert_eq!(kpis.len(), 2);

    // Ordered by net spend: Transport first.
    assert_eq!(kpis[0].dept_id, transport);
    assert_eq!(kpis[0].total_requests, 2);
    assert_eq!(kpis[0].approved, 1);
    assert_eq!(kpis[0].rejected, 1);
    assert_eq!(kpis[0].net_spend, money("100.00"));
    assert_eq!(kpis[0].max_request_cost, Some(money("100.00")));

    assert_eq!(kpis[1].dept_id, health);
    assert_eq!(kpis[1].pending, 1);
    assert_eq!(kpis[1].net_spend, Money::ZERO);
}

#[tokio::test]
async fn category_spend_only_counts_approvals() {
    let (engine, _db) = engine_with_db().await;
    seed_two_departments(&engine).await;

    let rows = engine.category_spend().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Vehicles");
    assert_eq!(rows[0].requests, 3);
    assert_eq!(rows[0].approved_spend, money("100.00"));
    assert_eq!(rows[0].avg_unit_cost, Some(money("25.00")));
}

#[tokio::test]
async fn vendor_performance_joins_ledger_spend() {
    let (engine, _db) = engine_with_db().await;
    let (_, _, vendor) = seed_two_departments(&engine).await;

    let rows = engine.vendor_performance().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].vendor_id, vendor);
    assert_eq!(rows[0].product_count, 1);
    assert_eq!(rows[0].total_spend, money("100.00"));
}
