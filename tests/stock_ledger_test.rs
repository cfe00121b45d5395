//! Integration tests for the stock ledger service.
//!
//! Each test runs against a fresh in-memory SQLite database with the
//! embedded migrations applied.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tokio::sync::mpsc;
use assert_matches::assert_matches;
use uuid::Uuid;

use valorsales_api::{
    db::{establish_connection_with_config, run_migrations, DbConfig, DbPool},
    entities::{
        inventory_transaction::{self, Entity as InventoryTransaction},
        ItemKind, TransactionType,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::stock_ledger::{
        NewInventoryRecord, RecordFilter, StockAdjustment, StockLedgerService,
    },
    services::stock_status::StockStatus,
};

async fn setup() -> (Arc<DbPool>, StockLedgerService, mpsc::Receiver<Event>) {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = Arc::new(
        establish_connection_with_config(&config)
            .await
            .expect("Failed to connect to in-memory database"),
    );
    run_migrations(db.as_ref())
        .await
        .expect("Failed to run migrations");

    let (tx, rx) = mpsc::channel(100);
    let event_sender = Arc::new(EventSender::new(tx));
    let service = StockLedgerService::new(db.clone(), event_sender);

    (db, service, rx)
}

fn new_record(item_id: Uuid, quantity: i32) -> NewInventoryRecord {
    NewInventoryRecord {
        item_id,
        item_kind: ItemKind::Product,
        item_name: "Dell Laptop XPS 13".to_string(),
        item_sku: "LAPTOP-001".to_string(),
        initial_quantity: quantity,
        minimum_stock: 10,
        maximum_stock: Some(1000),
        reorder_point: 20,
        unit: "unit".to_string(),
    }
}

fn adjustment(item_id: Uuid, delta: i32) -> StockAdjustment {
    StockAdjustment {
        item_id,
        item_kind: ItemKind::Product,
        delta,
        transaction_type: TransactionType::Adjustment,
        reference_id: None,
        reference_type: None,
        notes: None,
        actor_id: Some("tester".to_string()),
    }
}

#[tokio::test]
async fn create_and_fetch_record() {
    let (_db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();

    let created = service
        .create_record(new_record(item_id, 100))
        .await
        .expect("Failed to create record");
    assert_eq!(created.quantity, 100);
    assert_eq!(created.item_kind, ItemKind::Product);

    let fetched = service
        .get_record(created.id)
        .await
        .expect("Failed to fetch record");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.stock_status(), StockStatus::Normal);
}

#[tokio::test]
async fn create_rejects_duplicate_item() {
    let (_db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();

    service
        .create_record(new_record(item_id, 100))
        .await
        .expect("Failed to create record");

    let err = service
        .create_record(new_record(item_id, 50))
        .await
        .expect_err("Duplicate item should be rejected");
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn create_rejects_negative_initial_quantity() {
    let (_db, service, _rx) = setup().await;

    let err = service
        .create_record(new_record(Uuid::new_v4(), -5))
        .await
        .expect_err("Negative initial quantity should be rejected");
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn adjustment_updates_quantity_and_appends_ledger_row() {
    let (db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();
    let record = service
        .create_record(new_record(item_id, 100))
        .await
        .expect("Failed to create record");

    let outcome = service
        .apply_adjustment(adjustment(item_id, -30))
        .await
        .expect("Failed to apply adjustment");

    assert_eq!(outcome.record.quantity, 70);

    let tx_row = InventoryTransaction::find_by_id(outcome.transaction_id)
        .one(db.as_ref())
        .await
        .expect("Failed to query transaction")
        .expect("Transaction row missing");
    assert_eq!(tx_row.inventory_record_id, record.id);
    assert_eq!(tx_row.quantity_change, -30);
    assert_eq!(tx_row.quantity_before, 100);
    assert_eq!(tx_row.quantity_after, 70);
    assert_eq!(tx_row.created_by.as_deref(), Some("tester"));
}

#[tokio::test]
async fn adjustment_that_would_go_negative_rolls_back() {
    let (db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();
    let record = service
        .create_record(new_record(item_id, 10))
        .await
        .expect("Failed to create record");

    let err = service
        .apply_adjustment(adjustment(item_id, -11))
        .await
        .expect_err("Over-removal should fail");
    assert_matches!(err, ServiceError::InsufficientStock(_));

    // Quantity unchanged and no ledger row appended
    let unchanged = service
        .get_record(record.id)
        .await
        .expect("Failed to re-fetch record");
    assert_eq!(unchanged.quantity, 10);

    let tx_count = InventoryTransaction::find()
        .filter(inventory_transaction::Column::InventoryRecordId.eq(record.id))
        .count(db.as_ref())
        .await
        .expect("Failed to count transactions");
    assert_eq!(tx_count, 0);
}

#[tokio::test]
async fn over_removal_reports_true_magnitude_for_extreme_deltas() {
    let (_db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();
    service
        .create_record(new_record(item_id, 10))
        .await
        .expect("Failed to create record");

    let err = service
        .apply_adjustment(adjustment(item_id, i32::MIN))
        .await
        .expect_err("Over-removal should fail");
    let message = err.to_string();
    assert!(
        message.contains("requested removal is 2147483648"),
        "unexpected message: {message}"
    );
}

#[tokio::test]
async fn adjustment_rejects_zero_delta() {
    let (_db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();
    service
        .create_record(new_record(item_id, 10))
        .await
        .expect("Failed to create record");

    let err = service
        .apply_adjustment(adjustment(item_id, 0))
        .await
        .expect_err("Zero delta should be rejected");
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn adjustment_on_unknown_item_is_not_found() {
    let (_db, service, _rx) = setup().await;

    let err = service
        .apply_adjustment(adjustment(Uuid::new_v4(), 5))
        .await
        .expect_err("Unknown item should be rejected");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn positive_adjustment_sets_last_restocked_at() {
    let (_db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();
    let record = service
        .create_record(new_record(item_id, 10))
        .await
        .expect("Failed to create record");
    assert!(record.last_restocked_at.is_none());

    let outcome = service
        .apply_adjustment(adjustment(item_id, 40))
        .await
        .expect("Failed to apply restock");
    let restocked_at = outcome.record.last_restocked_at;
    assert!(restocked_at.is_some());

    let outcome = service
        .apply_adjustment(adjustment(item_id, -5))
        .await
        .expect("Failed to apply removal");
    // Removals do not count as restocks
    assert_eq!(outcome.record.last_restocked_at, restocked_at);
}

#[tokio::test]
async fn quantity_equals_sum_of_ledger_history() {
    let (db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();
    let record = service
        .create_record(new_record(item_id, 50))
        .await
        .expect("Failed to create record");

    for delta in [25, -10, -30, 100, -60] {
        service
            .apply_adjustment(adjustment(item_id, delta))
            .await
            .expect("Failed to apply adjustment");
    }

    let final_record = service
        .get_record(record.id)
        .await
        .expect("Failed to fetch record");

    let history = InventoryTransaction::find()
        .filter(inventory_transaction::Column::InventoryRecordId.eq(record.id))
        .all(db.as_ref())
        .await
        .expect("Failed to load history");
    let summed: i32 = history.iter().map(|tx| tx.quantity_change).sum();

    assert_eq!(final_record.quantity, 50 + summed);
    for tx in &history {
        assert_eq!(tx.quantity_after, tx.quantity_before + tx.quantity_change);
    }
}

#[tokio::test]
async fn transaction_history_is_paginated_newest_first() {
    let (_db, service, _rx) = setup().await;
    let item_id = Uuid::new_v4();
    let record = service
        .create_record(new_record(item_id, 100))
        .await
        .expect("Failed to create record");

    for delta in [1, 2, 3] {
        service
            .apply_adjustment(adjustment(item_id, delta))
            .await
            .expect("Failed to apply adjustment");
        // SQLite timestamp resolution needs a little spacing for stable order
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (page, total) = service
        .transaction_history(record.id, 1, 2)
        .await
        .expect("Failed to load history");
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].quantity_change, 3);
    assert_eq!(page[1].quantity_change, 2);

    let (page, _) = service
        .transaction_history(record.id, 2, 2)
        .await
        .expect("Failed to load second page");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].quantity_change, 1);
}

#[tokio::test]
async fn transaction_history_for_unknown_record_is_not_found() {
    let (_db, service, _rx) = setup().await;

    let err = service
        .transaction_history(Uuid::new_v4(), 1, 20)
        .await
        .expect_err("Unknown record should be a 404");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn low_stock_alerts_returns_only_records_at_or_below_reorder_point() {
    let (_db, service, _rx) = setup().await;

    let make = |sku: &str, qty: i32, min: i32, reorder: i32| NewInventoryRecord {
        item_id: Uuid::new_v4(),
        item_kind: ItemKind::RawMaterial,
        item_name: format!("Material {sku}"),
        item_sku: sku.to_string(),
        initial_quantity: qty,
        minimum_stock: min,
        maximum_stock: None,
        reorder_point: reorder,
        unit: "kg".to_string(),
    };

    service.create_record(make("MAT-LOW", 5, 10, 20)).await.unwrap();
    service.create_record(make("MAT-EDGE", 20, 10, 20)).await.unwrap();
    service.create_record(make("MAT-OK", 100, 10, 20)).await.unwrap();

    let alerts = service
        .low_stock_alerts()
        .await
        .expect("Failed to load alerts");
    let skus: Vec<&str> = alerts.iter().map(|r| r.item_sku.as_str()).collect();

    // Ordered by quantity ascending, healthy record excluded
    assert_eq!(skus, vec!["MAT-LOW", "MAT-EDGE"]);
}

#[tokio::test]
async fn list_records_filters_by_kind_and_low_stock() {
    let (_db, service, _rx) = setup().await;

    service
        .create_record(new_record(Uuid::new_v4(), 100))
        .await
        .unwrap();
    service
        .create_record(NewInventoryRecord {
            item_id: Uuid::new_v4(),
            item_kind: ItemKind::RawMaterial,
            item_name: "Steel rod".to_string(),
            item_sku: "STEEL-001".to_string(),
            initial_quantity: 2,
            minimum_stock: 10,
            maximum_stock: None,
            reorder_point: 20,
            unit: "kg".to_string(),
        })
        .await
        .unwrap();

    let (all, total) = service
        .list_records(RecordFilter::default(), 1, 20)
        .await
        .expect("Failed to list records");
    assert_eq!(total, 2);
    assert_eq!(all.len(), 2);

    let (raw_only, total) = service
        .list_records(
            RecordFilter {
                item_kind: Some(ItemKind::RawMaterial),
                low_stock_only: false,
            },
            1,
            20,
        )
        .await
        .expect("Failed to filter by kind");
    assert_eq!(total, 1);
    assert_eq!(raw_only[0].item_sku, "STEEL-001");

    let (low, total) = service
        .list_records(
            RecordFilter {
                item_kind: None,
                low_stock_only: true,
            },
            1,
            20,
        )
        .await
        .expect("Failed to filter low stock");
    assert_eq!(total, 1);
    assert_eq!(low[0].item_sku, "STEEL-001");
}

#[tokio::test]
async fn adjustment_emits_inventory_events() {
    let (_db, service, mut rx) = setup().await;
    let item_id = Uuid::new_v4();
    service
        .create_record(new_record(item_id, 100))
        .await
        .expect("Failed to create record");

    match rx.recv().await.expect("Expected created event") {
        Event::InventoryRecordCreated {
            item_id: event_item,
            ..
        } => assert_eq!(event_item, item_id),
        other => panic!("Unexpected event: {:?}", other),
    }

    service
        .apply_adjustment(adjustment(item_id, -90))
        .await
        .expect("Failed to apply adjustment");

    match rx.recv().await.expect("Expected adjusted event") {
        Event::InventoryAdjusted {
            quantity_change,
            new_quantity,
            ..
        } => {
            assert_eq!(quantity_change, -90);
            assert_eq!(new_quantity, 10);
        }
        other => panic!("Unexpected event: {:?}", other),
    }

    // 10 <= reorder point 20, so a low stock event follows
    match rx.recv().await.expect("Expected low stock event") {
        Event::InventoryBelowReorderPoint {
            quantity,
            reorder_point,
            ..
        } => {
            assert_eq!(quantity, 10);
            assert_eq!(reorder_point, 20);
        }
        other => panic!("Unexpected event: {:?}", other),
    }
}
