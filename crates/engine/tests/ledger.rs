use chrono::{Local, NaiveDate};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    Billing, Credit, CreditKind, CreditStatus, Engine, LedgerError, Money, NewCredit,
    NewCreditPayment, NewProduct, NewReturn, NewSale, PaymentMethod, SaleItem, SettingsPatch,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

async fn engine_with_file_db() -> (Engine, DatabaseConnection, String, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();

    (engine, db, url, path)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn rupees(r: i64) -> Money {
    Money::new(r * 100)
}

#[tokio::test]
async fn partial_paid_sale_creates_linked_credit() {
    let (mut engine, _db) = engine_with_db().await;

    let sale_id = engine
        .add_sale(
            NewSale::new(rupees(1000), PaymentMethod::Cash, day(1))
                .customer("Amit")
                .paid(rupees(400)),
        )
        .await
        .unwrap();

    let sale = engine.snapshot().sale(sale_id).unwrap();
    let credit_id = sale.linked_credit_id.expect("credit should be linked");
    let credit = engine.snapshot().credit(credit_id).unwrap();

    assert_eq!(credit.kind, CreditKind::Given);
    assert_eq!(credit.amount, rupees(600));
    assert_eq!(credit.status, CreditStatus::Pending);
    assert_eq!(credit.linked_sale_id, Some(sale_id));
    assert_eq!(engine.credits().len(), 1);

    engine
        .add_credit_payment(
            credit_id,
            NewCreditPayment::new(rupees(600), PaymentMethod::Cash, day(2)),
        )
        .await
        .unwrap();

    let credit = engine.snapshot().credit(credit_id).unwrap();
    assert_eq!(credit.paid_amount, rupees(600));
    assert_eq!(credit.status, CreditStatus::Paid);
}

#[tokio::test]
async fn fully_paid_sale_creates_no_credit() {
    let (mut engine, _db) = engine_with_db().await;

    let sale_id = engine
        .add_sale(NewSale::new(rupees(500), PaymentMethod::Upi, day(1)).customer("Renu"))
        .await
        .unwrap();

    assert!(engine.snapshot().sale(sale_id).unwrap().linked_credit_id.is_none());
    assert!(engine.credits().is_empty());
}

#[tokio::test]
async fn partial_sale_without_customer_is_rejected() {
    let (mut engine, _db) = engine_with_db().await;

    let err = engine
        .add_sale(NewSale::new(rupees(1000), PaymentMethod::Cash, day(1)).paid(rupees(400)))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(engine.sales().is_empty());
    assert!(engine.credits().is_empty());
}

#[tokio::test]
async fn sale_rejects_out_of_range_amounts() {
    let (mut engine, _db) = engine_with_db().await;

    let err = engine
        .add_sale(NewSale::new(Money::ZERO, PaymentMethod::Cash, day(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = engine
        .add_sale(
            NewSale::new(rupees(100), PaymentMethod::Cash, day(1))
                .customer("Amit")
                .paid(rupees(200)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn sale_decrements_stock_and_return_restocks() {
    let (mut engine, _db) = engine_with_db().await;

    let product_id = engine
        .add_product(NewProduct::new("Chai Patti", 10, rupees(50)))
        .await
        .unwrap();

    let sale_id = engine
        .add_sale(
            NewSale::new(rupees(150), PaymentMethod::Cash, day(1))
                .item(SaleItem::new(product_id, 3, rupees(50))),
        )
        .await
        .unwrap();
    assert_eq!(engine.snapshot().product(product_id).unwrap().stock, 7);

    engine.add_return(NewReturn::new(sale_id, day(2))).await.unwrap();
    assert_eq!(engine.snapshot().product(product_id).unwrap().stock, 10);
}

#[tokio::test]
async fn stock_decrement_clamps_at_zero() {
    let (mut engine, _db) = engine_with_db().await;

    let product_id = engine
        .add_product(NewProduct::new("Soap", 2, rupees(30)))
        .await
        .unwrap();

    engine
        .add_sale(
            NewSale::new(rupees(150), PaymentMethod::Cash, day(1))
                .item(SaleItem::new(product_id, 5, rupees(30))),
        )
        .await
        .unwrap();

    assert_eq!(engine.snapshot().product(product_id).unwrap().stock, 0);
}

#[tokio::test]
async fn delete_sale_cascades_to_linked_credit() {
    let (mut engine, _db) = engine_with_db().await;

    let linked = engine
        .add_sale(
            NewSale::new(rupees(1000), PaymentMethod::Cash, day(1))
                .customer("Amit")
                .paid(rupees(400)),
        )
        .await
        .unwrap();
    let plain = engine
        .add_sale(NewSale::new(rupees(200), PaymentMethod::Cash, day(1)))
        .await
        .unwrap();
    assert_eq!(engine.credits().len(), 1);

    engine.delete_sale(linked).await.unwrap();
    assert!(engine.credits().is_empty());
    assert_eq!(engine.sales().len(), 1);

    engine.delete_sale(plain).await.unwrap();
    assert!(engine.sales().is_empty());
}

#[tokio::test]
async fn return_force_closes_linked_credit() {
    let (mut engine, _db) = engine_with_db().await;

    let sale_id = engine
        .add_sale(
            NewSale::new(rupees(1000), PaymentMethod::Cash, day(1))
                .customer("Amit")
                .paid(rupees(400)),
        )
        .await
        .unwrap();
    let credit_id = engine.snapshot().sale(sale_id).unwrap().linked_credit_id.unwrap();

    engine
        .add_credit_payment(
            credit_id,
            NewCreditPayment::new(rupees(100), PaymentMethod::Upi, day(2)),
        )
        .await
        .unwrap();

    let return_id = engine.add_return(NewReturn::new(sale_id, day(3))).await.unwrap();

    // refund equals the paid amount, the owed remainder is forgiven
    let ret = engine.snapshot().sale_return(return_id).unwrap();
    assert_eq!(ret.amount, rupees(400));

    let credit = engine.snapshot().credit(credit_id).unwrap();
    assert_eq!(credit.status, CreditStatus::Paid);
    assert_eq!(credit.amount, rupees(100));
    assert_eq!(credit.paid_amount, rupees(100));

    // deleting the return does not reopen the credit
    engine.delete_return(return_id).await.unwrap();
    let credit = engine.snapshot().credit(credit_id).unwrap();
    assert_eq!(credit.status, CreditStatus::Paid);
}

#[tokio::test]
async fn second_return_for_same_sale_is_rejected() {
    let (mut engine, _db) = engine_with_db().await;

    let sale_id = engine
        .add_sale(NewSale::new(rupees(300), PaymentMethod::Cash, day(1)))
        .await
        .unwrap();
    engine.add_return(NewReturn::new(sale_id, day(2))).await.unwrap();

    let err = engine
        .add_return(NewReturn::new(sale_id, day(3)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateOperation(_)));
    assert_eq!(engine.returns().len(), 1);
}

#[tokio::test]
async fn return_for_unknown_sale_is_rejected() {
    let (mut engine, _db) = engine_with_db().await;

    let err = engine
        .add_return(NewReturn::new(Uuid::new_v4(), day(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn delete_return_redecrements_the_item_snapshot() {
    let (mut engine, _db) = engine_with_db().await;

    let product_id = engine
        .add_product(NewProduct::new("Biscuit", 10, rupees(10)))
        .await
        .unwrap();
    let sale_id = engine
        .add_sale(
            NewSale::new(rupees(40), PaymentMethod::Cash, day(1))
                .item(SaleItem::new(product_id, 4, rupees(10))),
        )
        .await
        .unwrap();
    let return_id = engine.add_return(NewReturn::new(sale_id, day(2))).await.unwrap();
    assert_eq!(engine.snapshot().product(product_id).unwrap().stock, 10);

    // even after the sale is gone, the return's own item copy drives the
    // stock adjustment
    engine.delete_sale(sale_id).await.unwrap();
    engine.delete_return(return_id).await.unwrap();
    assert_eq!(engine.snapshot().product(product_id).unwrap().stock, 6);
}

#[tokio::test]
async fn update_credit_recomputes_status_from_merged_fields() {
    let (mut engine, _db) = engine_with_db().await;

    let credit_id = engine
        .add_credit(NewCredit::new(
            "Suresh",
            CreditKind::Taken,
            rupees(500),
            day(1),
        ))
        .await
        .unwrap();

    engine
        .update_credit(
            credit_id,
            engine::CreditPatch {
                paid_amount: Some(rupees(500)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        engine.snapshot().credit(credit_id).unwrap().status,
        CreditStatus::Paid
    );

    engine
        .update_credit(
            credit_id,
            engine::CreditPatch {
                amount: Some(rupees(800)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        engine.snapshot().credit(credit_id).unwrap().status,
        CreditStatus::Pending
    );
}

#[tokio::test]
async fn credit_payment_for_unknown_credit_is_rejected() {
    let (mut engine, _db) = engine_with_db().await;

    let err = engine
        .add_credit_payment(
            Uuid::new_v4(),
            NewCreditPayment::new(rupees(100), PaymentMethod::Cash, day(1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn delete_product_blocked_while_referenced() {
    let (mut engine, _db) = engine_with_db().await;

    let product_id = engine
        .add_product(NewProduct::new("Rice", 50, rupees(60)))
        .await
        .unwrap();
    let sale_id = engine
        .add_sale(
            NewSale::new(rupees(120), PaymentMethod::Cash, day(1))
                .item(SaleItem::new(product_id, 2, rupees(60))),
        )
        .await
        .unwrap();

    let err = engine.delete_product(product_id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));
    assert_eq!(engine.products().len(), 1);

    engine.delete_sale(sale_id).await.unwrap();
    engine.delete_product(product_id).await.unwrap();
    assert!(engine.products().is_empty());
}

#[tokio::test]
async fn delete_contact_blocked_while_referenced() {
    let (mut engine, _db) = engine_with_db().await;

    let contact_id = engine
        .add_contact(engine::NewContact::new("Amit", engine::ContactKind::Customer))
        .await
        .unwrap();
    let sale_id = engine
        .add_sale(NewSale::new(rupees(100), PaymentMethod::Cash, day(1)).customer("amit"))
        .await
        .unwrap();

    let err = engine.delete_contact(contact_id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));

    engine.delete_sale(sale_id).await.unwrap();
    engine.delete_contact(contact_id).await.unwrap();
    assert!(engine.contacts().is_empty());
}

#[tokio::test]
async fn invoice_numbers_increment_once_per_numbered_sale() {
    let (mut engine, _db) = engine_with_db().await;

    engine
        .update_settings(SettingsPatch {
            tax_enabled: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();

    for _ in 0..2 {
        engine
            .add_sale(
                NewSale::new(rupees(100), PaymentMethod::Cash, day(1))
                    .billing(Billing::default()),
            )
            .await
            .unwrap();
    }
    // a sale without a billing block is not numbered
    engine
        .add_sale(NewSale::new(rupees(100), PaymentMethod::Cash, day(1)))
        .await
        .unwrap();

    let numbers: Vec<Option<String>> = engine
        .sales()
        .iter()
        .map(|sale| sale.billing.as_ref().and_then(|b| b.invoice_number.clone()))
        .collect();
    assert_eq!(
        numbers,
        vec![
            Some("INV-0001".to_string()),
            Some("INV-0002".to_string()),
            None
        ]
    );
    assert_eq!(engine.settings().last_invoice_number, 2);
}

#[tokio::test]
async fn balance_scenario_over_engine_readers() {
    let (mut engine, _db) = engine_with_db().await;
    let today = Local::now().date_naive();

    engine
        .add_sale(NewSale::new(rupees(500), PaymentMethod::Cash, today))
        .await
        .unwrap();
    engine
        .add_expense(engine::NewExpense::new("tea", rupees(200), today))
        .await
        .unwrap();

    assert_eq!(engine.today_sales(), rupees(500));
    assert_eq!(engine.today_cash_received(), rupees(500));
    assert_eq!(engine.today_upi_received(), Money::ZERO);
    assert_eq!(engine.today_expenses(), rupees(200));
    assert_eq!(engine.balance(), rupees(300));
    assert_eq!(engine.cash_balance(), rupees(300));
    assert_eq!(engine.upi_balance(), Money::ZERO);
    // idempotent absent intervening mutation
    assert_eq!(engine.balance(), rupees(300));
}

#[tokio::test]
async fn backup_round_trip_reproduces_the_snapshot() {
    let (mut engine, _db) = engine_with_db().await;

    let product_id = engine
        .add_product(NewProduct::new("Sugar", 20, rupees(45)))
        .await
        .unwrap();
    engine
        .add_sale(
            NewSale::new(rupees(900), PaymentMethod::Upi, day(1))
                .customer("Amit")
                .paid(rupees(400))
                .item(SaleItem::new(product_id, 2, rupees(45))),
        )
        .await
        .unwrap();

    let backup = engine.export_all_data();
    let json = serde_json::to_string(&backup).unwrap();

    let (mut restored, _db2) = engine_with_db().await;
    let parsed: engine::Backup = serde_json::from_str(&json).unwrap();
    assert!(restored.restore_data(parsed).await.unwrap());

    assert_eq!(restored.snapshot(), engine.snapshot());
    assert_eq!(restored.balance(), engine.balance());
}

#[tokio::test]
async fn clear_all_data_resets_collections_and_settings() {
    let (mut engine, _db) = engine_with_db().await;

    engine
        .update_settings(SettingsPatch {
            tax_enabled: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    engine
        .add_sale(NewSale::new(rupees(100), PaymentMethod::Cash, day(1)))
        .await
        .unwrap();

    assert!(engine.clear_all_data().await.unwrap());
    assert!(engine.sales().is_empty());
    assert!(!engine.settings().tax_enabled);
}

#[tokio::test]
async fn restart_engine_reads_same_state() {
    let (mut engine, db, url, path) = engine_with_file_db().await;

    let sale_id = engine
        .add_sale(
            NewSale::new(rupees(1000), PaymentMethod::Cash, day(1))
                .customer("Amit")
                .paid(rupees(400)),
        )
        .await
        .unwrap();

    drop(engine);
    drop(db);

    let db2 = Database::connect(&url).await.unwrap();
    let engine2 = Engine::builder().database(db2.clone()).build().await.unwrap();

    let sale = engine2.snapshot().sale(sale_id).unwrap();
    assert_eq!(sale.total_amount, rupees(1000));
    assert_eq!(engine2.credits().len(), 1);

    drop(db2);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn dangling_links_are_cleared_on_load() {
    let (mut engine, db) = engine_with_db().await;

    // a backup with a sale pointing at a credit that does not exist and a
    // credit pointing at a sale that does not exist
    let mut backup = engine.export_all_data();
    backup.sales.push(engine::Sale {
        id: Uuid::new_v4(),
        date: day(1),
        customer_name: "Amit".to_string(),
        total_amount: rupees(100),
        paid_amount: Some(rupees(100)),
        payment_method: PaymentMethod::Cash,
        note: None,
        linked_credit_id: Some(Uuid::new_v4()),
        items: Vec::new(),
        billing: None,
    });
    backup.credits.push(Credit {
        id: Uuid::new_v4(),
        party: "Suresh".to_string(),
        kind: CreditKind::Given,
        amount: rupees(50),
        paid_amount: Money::ZERO,
        status: CreditStatus::Pending,
        date: day(1),
        linked_sale_id: Some(Uuid::new_v4()),
        payments: Vec::new(),
    });
    engine.restore_data(backup).await.unwrap();

    let engine2 = Engine::builder().database(db.clone()).build().await.unwrap();
    assert!(engine2.sales()[0].linked_credit_id.is_none());
    assert!(engine2.credits()[0].linked_sale_id.is_none());
}
