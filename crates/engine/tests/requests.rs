use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    CreateRequestCmd, DecisionCmd, Engine, EngineError, LedgerFilter, LogCategory, Money,
    NewDepartmentCmd, NewOfficialCmd, NewProductCmd, NewVendorCmd, RequestListFilter,
    RequestStatus, SortOrder,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    // One pooled connection so every query sees the same in-memory database
    // and concurrent transactions serialize instead of hitting SQLITE_BUSY.
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

struct Fixture {
    dept: String,
    vendor: String,
    product: String,
    admin: String,
}

async fn seed(engine: &Engine, budget: Money, unit_cost: Money, stock: u32) -> Fixture {
    let dept = engine
        .create_department(NewDepartmentCmd::new(
            "Infrastructure",
            "infra@gov.example",
            budget,
            Utc::now(),
        ))
        .await
        .unwrap();
    let vendor = engine
        .create_vendor(NewVendorCmd::new("Acme Supplies", "Hardware", Utc::now()))
        .await
        .unwrap();
    let product = engine
        .create_product(
            NewProductCmd::new("Steel Bolt", "Hardware", &vendor, unit_cost, Utc::now())
                .stock_available(stock),
        )
        .await
        .unwrap();
    let admin = engine
        .create_official(NewOfficialCmd::new(
            "Jordan Reyes",
            "jordan@gov.example",
            Utc::now(),
        ))
        .await
        .unwrap();
    Fixture {
        dept,
        vendor,
        product,
        admin,
    }
}

async fn exec(db: &DatabaseConnection, sql: &str, values: Vec<sea_orm::Value>) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(backend, sql, values))
        .await
        .unwrap();
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

#[tokio::test]
async fn create_assigns_sequential_request_ids() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, Money::from_major(1000), Money::from_major(10), 50).await;

    let first = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let second = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 2, Utc::now()))
        .await
        .unwrap();

    assert_eq!(first, "REQ0000001");
    assert_eq!(second, "REQ0000002");

    let request = engine.get_request(&first).await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.total_cost, money("50.00000000"));
    assert_eq!(request.vendor_id, fx.vendor);
    assert!(request.approval_authority.is_none());
    assert!(request.decided_at.is_none());
}

#[tokio::test]
async fn create_validates_inputs() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, Money::from_major(1000), Money::from_major(10), 50).await;

    let err = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 0, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .create_request(CreateRequestCmd::new("  ", &fx.product, 1, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .create_request(CreateRequestCmd::new(&fx.dept, "PRO9999", 1, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .create_request(CreateRequestCmd::new("DPT999", &fx.product, 1, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn create_rejects_blacklisted_vendor() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, Money::from_major(1000), Money::from_major(10), 50).await;

    engine
        .blacklist_vendor(&fx.vendor, &fx.admin)
        .await
        .unwrap();

    let err = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 1, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BusinessRule(_)));

    // The failed creation left nothing behind.
    let requests = engine
        .list_requests(&RequestListFilter::default(), SortOrder::default())
        .await
        .unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn approve_moves_stock_budget_and_ledger() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    engine
        .approve_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap();

    let request = engine.get_request(&request_id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Approved);
    assert_eq!(request.total_cost, money("50.00000000"));
    assert_eq!(request.approval_authority.as_deref(), Some("Jordan Reyes"));
    assert!(request.decided_at.is_some());

    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 45);

    let department = engine.get_department(&fx.dept).await.unwrap();
    assert_eq!(department.current_budget, Some(money("950.00")));

    let entries = engine.get_ledger(&LedgerFilter::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "BUD0000001");
    assert_eq!(entries[0].category, LogCategory::Procurement);
    assert_eq!(entries[0].amount, money("50.00000000"));
    assert_eq!(entries[0].request_id, request_id);
    assert_eq!(entries[0].admin_id, fx.admin);
}

#[tokio::test]
async fn cancel_fully_reverses_an_approval() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    engine
        .approve_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap();
    engine
        .cancel_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap();

    // The row is gone entirely, not flagged.
    let err = engine.get_request(&request_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 50);
    let department = engine.get_department(&fx.dept).await.unwrap();
    assert_eq!(department.current_budget, Some(money("1000.00")));

    // Only the ledger remembers: spend then reversal, netting to zero.
    let entries = engine.get_ledger(&LedgerFilter::default()).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "BUD0000002");
    assert_eq!(entries[0].category, LogCategory::Reversal);
    assert_eq!(entries[0].amount, money("-50.00000000"));
    assert_eq!(entries[1].category, LogCategory::Procurement);

    assert_eq!(
        engine.department_spend(&fx.dept).await.unwrap(),
        Money::ZERO
    );
}

#[tokio::test]
async fn reject_stamps_decision_and_is_not_repeatable() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    engine
        .reject_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap();

    let request = engine.get_request(&request_id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Rejected);
    assert_eq!(request.approval_authority.as_deref(), Some("Jordan Reyes"));
    assert!(request.decided_at.is_some());

    // No budget, stock or ledger movement.
    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 50);
    assert!(engine
        .get_ledger(&LedgerFilter::default())
        .await
        .unwrap()
        .is_empty());

    let err = engine
        .reject_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BusinessRule(_)));

    let err = engine
        .approve_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BusinessRule(_)));
}

#[tokio::test]
async fn approve_fails_when_budget_short_by_one_minor_unit() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("49.99999999"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let err = engine
        .approve_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    // The attempt left all entities untouched.
    let request = engine.get_request(&request_id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 50);
    let department = engine.get_department(&fx.dept).await.unwrap();
    assert_eq!(department.current_budget, Some(money("49.99999999")));
    assert!(engine
        .get_ledger(&LedgerFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn approve_fails_on_insufficient_stock() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 3).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let err = engine
        .approve_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));

    let department = engine.get_department(&fx.dept).await.unwrap();
    assert_eq!(department.current_budget, Some(money("1000.00")));
    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 3);
}

#[tokio::test]
async fn second_approval_cannot_oversell_stock() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 5).await;

    let first = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let second = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();

    engine
        .approve_request(DecisionCmd::new(&first, &fx.admin, Utc::now()))
        .await
        .unwrap();
    let err = engine
        .approve_request(DecisionCmd::new(&second, &fx.admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientStock(_)));

    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 0);
}

#[tokio::test]
async fn concurrent_approvals_exactly_one_succeeds() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 5).await;

    let first = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let second = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();

    let engine = Arc::new(engine);
    let admin = fx.admin.clone();

    let a = {
        let engine = Arc::clone(&engine);
        let admin = admin.clone();
        tokio::spawn(async move {
            engine
                .approve_request(DecisionCmd::new(first, admin, Utc::now()))
                .await
        })
    };
    let b = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            engine
                .approve_request(DecisionCmd::new(second, admin, Utc::now()))
                .await
        })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let failure = if a.is_err() { a } else { b };
    assert!(matches!(
        failure.unwrap_err(),
        EngineError::InsufficientStock(_)
    ));

    // No negative stock, and the budget moved exactly once.
    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 0);
    let department = engine.get_department(&fx.dept).await.unwrap();
    assert_eq!(department.current_budget, Some(money("950.00")));
    let entries = engine.get_ledger(&LedgerFilter::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn derived_budget_tracks_approved_spend() {
    let (engine, _db) = engine_with_db().await;
    let dept = engine
        .create_department(
            NewDepartmentCmd::new(
                "Archives",
                "archives@gov.example",
                money("70.00"),
                Utc::now(),
            )
            .derived_budget(),
        )
        .await
        .unwrap();
    let vendor = engine
        .create_vendor(NewVendorCmd::new("Scriptoria", "Paper", Utc::now()))
        .await
        .unwrap();
    let product = engine
        .create_product(
            NewProductCmd::new("Ledger Book", "Paper", &vendor, money("30.00"), Utc::now())
                .stock_available(10),
        )
        .await
        .unwrap();
    let admin = engine
        .create_official(NewOfficialCmd::new("Sam Okafor", "sam@gov.example", Utc::now()))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            engine
                .create_request(CreateRequestCmd::new(&dept, &product, 1, Utc::now()))
                .await
                .unwrap(),
        );
    }

    // 70 allocated: two approvals of 30 fit, the third does not.
    engine
        .approve_request(DecisionCmd::new(&ids[0], &admin, Utc::now()))
        .await
        .unwrap();
    engine
        .approve_request(DecisionCmd::new(&ids[1], &admin, Utc::now()))
        .await
        .unwrap();
    let err = engine
        .approve_request(DecisionCmd::new(&ids[2], &admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    // The stored balance stays absent throughout.
    let department = engine.get_department(&dept).await.unwrap();
    assert_eq!(department.current_budget, None);

    // Cancelling one approval frees derived headroom for the third.
    engine
        .cancel_request(DecisionCmd::new(&ids[0], &admin, Utc::now()))
        .await
        .unwrap();
    let department = engine.get_department(&dept).await.unwrap();
    assert_eq!(department.current_budget, None);

    engine
        .approve_request(DecisionCmd::new(&ids[2], &admin, Utc::now()))
        .await
        .unwrap();
}

#[tokio::test]
async fn approve_recomputes_a_zero_total() {
    let (engine, db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    exec(
        &db,
        "UPDATE procurement_requests SET total_cost_minor = 0 WHERE id = ?",
        vec![request_id.clone().into()],
    )
    .await;

    engine
        .approve_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap();

    let request = engine.get_request(&request_id).await.unwrap();
    assert_eq!(request.total_cost, money("50.00000000"));
    let department = engine.get_department(&fx.dept).await.unwrap();
    assert_eq!(department.current_budget, Some(money("950.00")));
}

#[tokio::test]
async fn sequencer_continues_from_legacy_ids() {
    let (engine, db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 1, Utc::now()))
        .await
        .unwrap();
    // Simulate a database written before the counters existed.
    exec(
        &db,
        "UPDATE procurement_requests SET id = 'REQ0000041' WHERE id = ?",
        vec![request_id.into()],
    )
    .await;
    exec(
        &db,
        "DELETE FROM sequences WHERE kind = 'request'",
        Vec::new(),
    )
    .await;

    let next = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 1, Utc::now()))
        .await
        .unwrap();
    assert_eq!(next, "REQ0000042");
}

#[tokio::test]
async fn ledger_filters_and_net_spend() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let first = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let second = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 2, Utc::now()))
        .await
        .unwrap();
    engine
        .approve_request(DecisionCmd::new(&first, &fx.admin, Utc::now()))
        .await
        .unwrap();
    engine
        .approve_request(DecisionCmd::new(&second, &fx.admin, Utc::now()))
        .await
        .unwrap();
    engine
        .cancel_request(DecisionCmd::new(&first, &fx.admin, Utc::now()))
        .await
        .unwrap();

    let all = engine.get_ledger(&LedgerFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    // Newest first; the reversal is the last entry written.
    assert_eq!(all[0].id, "BUD0000003");
    assert_eq!(all[0].category, LogCategory::Reversal);

    let reversals = engine
        .get_ledger(&LedgerFilter {
            category: Some(LogCategory::Reversal),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(reversals.len(), 1);
    assert_eq!(reversals[0].amount, money("-50.00000000"));

    let by_request = engine
        .get_ledger(&LedgerFilter {
            request_id: Some(second.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_request.len(), 1);

    // 50 spent, 50 reversed, 20 spent: net 20.
    assert_eq!(
        engine.department_spend(&fx.dept).await.unwrap(),
        money("20.00")
    );
}

#[tokio::test]
async fn cancel_requires_an_approved_request() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let err = engine
        .cancel_request(DecisionCmd::new(&request_id, &fx.admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BusinessRule(_)));

    let err = engine
        .cancel_request(DecisionCmd::new("REQ9999999", &fx.admin, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn unknown_admin_cannot_decide() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let request_id = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let err = engine
        .approve_request(DecisionCmd::new(&request_id, "DEF999", Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BusinessRule(_)));

    let request = engine.get_request(&request_id).await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
}

#[tokio::test]
async fn restock_and_blacklist_rules() {
    let (engine, _db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    engine.restock_product(&fx.product, 10).await.unwrap();
    let product = engine.get_product(&fx.product).await.unwrap();
    assert_eq!(product.stock_available, 60);

    let err = engine.restock_product(&fx.product, 0).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = engine.restock_product("PRO9999", 1).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .blacklist_vendor(&fx.vendor, "DEF999")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BusinessRule(_)));
    let vendor = engine.get_vendor(&fx.vendor).await.unwrap();
    assert!(!vendor.blacklisted);
}

#[tokio::test]
async fn list_requests_filters_sorts_and_resolves_names() {
    let (engine, db) = engine_with_db().await;
    let fx = seed(&engine, money("1000.00"), money("10.00"), 50).await;

    let first = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 5, Utc::now()))
        .await
        .unwrap();
    let second = engine
        .create_request(CreateRequestCmd::new(&fx.dept, &fx.product, 2, Utc::now()))
        .await
        .unwrap();
    engine
        .approve_request(DecisionCmd::new(&first, &fx.admin, Utc::now()))
        .await
        .unwrap();

    // Default order is newest first.
    let all = engine
        .list_requests(&RequestListFilter::default(), SortOrder::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].0.id, second);

    let asc = engine
        .list_requests(&RequestListFilter::default(), SortOrder::Asc)
        .await
        .unwrap();
    assert_eq!(asc[0].0.id, first);

    let pending = engine
        .list_requests(
            &RequestListFilter {
                status: Some(RequestStatus::Pending),
                ..Default::default()
            },
            SortOrder::default(),
        )
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0.id, second);

    let searched = engine
        .list_requests(
            &RequestListFilter {
                search: Some(first.clone()),
                ..Default::default()
            },
            SortOrder::default(),
        )
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);

    // A pre-existing row may store the admin id instead of the resolved
    // name; the listing joins it back to the official.
    exec(
        &db,
        "UPDATE procurement_requests SET approval_authority = ? WHERE id = ?",
        vec![fx.admin.clone().into(), first.clone().into()],
    )
    .await;
    let rows = engine
        .list_requests(
            &RequestListFilter {
                search: Some(first.clone()),
                ..Default::default()
            },
            SortOrder::default(),
        )
        .await
        .unwrap();
    assert_eq!(rows[0].1.as_deref(), Some("Jordan Reyes"));
}
