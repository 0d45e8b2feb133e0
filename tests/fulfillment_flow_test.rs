//! End-to-end fulfillment flows over a wired `AppState`.
//!
//! Covers the stock-availability invariants: validate-then-deduct, batch
//! rejection without partial effects, most-recent-first ordering, the
//! restock-on-delete policy, and serialization of concurrent callers.

mod common;

use std::sync::Arc;
use std::thread;

use assert_matches::assert_matches;
use common::TestApp;
use nexgen_core::config::AppConfig;
use nexgen_core::errors::ServiceError;
use nexgen_core::models::{InventoryStatus, SalesOrderStatus};
use nexgen_core::services::{CreateOrderRequest, OrderLineRequest};
use rust_decimal_macros::dec;

fn order_request(lines: Vec<OrderLineRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        user_id: "user-1".into(),
        username: "John Staff".into(),
        items: lines,
        document_name: None,
        document_type: None,
    }
}

#[test]
fn order_deducts_stock_and_lands_first_in_the_ledger() {
    let app = TestApp::new();
    let item = app.seed_item("Desk Lamp", 5, dec!(10.00));

    let order = app
        .state
        .fulfillment
        .create_order(order_request(vec![OrderLineRequest {
            inventory_id: item.clone(),
            quantity: 3,
        }]))
        .expect("order should be fulfilled");

    assert_eq!(order.status, SalesOrderStatus::Approved);
    assert_eq!(order.total_amount, dec!(30.00));
    assert!(order.id.starts_with("SO-"));

    let record = app.state.inventory.get(&item).unwrap().unwrap();
    assert_eq!(record.quantity, 2);
    assert_eq!(record.status, InventoryStatus::LowStock);

    let orders = app.state.orders.list().unwrap();
    assert_eq!(orders[0].id, order.id);
}

#[test]
fn oversell_fails_whole_batch_with_no_inventory_change() {
    let app = TestApp::new();
    let item = app.seed_item("Desk Lamp", 5, dec!(10.00));

    let err = app
        .state
        .fulfillment
        .create_order(order_request(vec![OrderLineRequest {
            inventory_id: item.clone(),
            quantity: 6,
        }]))
        .unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(name) if name == "Desk Lamp");
    assert_eq!(app.state.inventory.get(&item).unwrap().unwrap().quantity, 5);
    assert!(app.state.orders.list().unwrap().is_empty());
}

#[test]
fn multi_line_total_sums_quantity_times_price() {
    let app = TestApp::new();
    let a = app.seed_item("Item A", 10, dec!(10.00));
    let b = app.seed_item("Item B", 10, dec!(5.00));

    let order = app
        .state
        .fulfillment
        .create_order(order_request(vec![
            OrderLineRequest {
                inventory_id: a,
                quantity: 2,
            },
            OrderLineRequest {
                inventory_id: b,
                quantity: 1,
            },
        ]))
        .unwrap();

    assert_eq!(order.total_amount, dec!(25.00));
    assert_eq!(order.items.len(), 2);
}

#[test]
fn snapshot_prices_survive_later_inventory_edits() {
    let app = TestApp::new();
    let item = app.seed_item("Desk Lamp", 10, dec!(10.00));

    let order = app
        .state
        .fulfillment
        .create_order(order_request(vec![OrderLineRequest {
            inventory_id: item.clone(),
            quantity: 1,
        }]))
        .unwrap();

    app.state
        .inventory
        .update(
            &item,
            nexgen_core::repositories::UpdateInventoryRequest {
                unit_price: Some(dec!(99.00)),
                item_name: Some("Renamed Lamp".into()),
                ..Default::default()
            },
        )
        .unwrap();

    let stored = app.state.orders.get(&order.id).unwrap().unwrap();
    assert_eq!(stored.items[0].unit_price, dec!(10.00));
    assert_eq!(stored.items[0].item_name, "Desk Lamp");
}

#[test]
fn attachment_metadata_is_persisted_with_the_order() {
    let app = TestApp::new();
    let item = app.seed_item("Desk Lamp", 5, dec!(10.00));

    let order = app
        .state
        .fulfillment
        .create_order(CreateOrderRequest {
            user_id: "user-1".into(),
            username: "John Staff".into(),
            items: vec![OrderLineRequest {
                inventory_id: item,
                quantity: 1,
            }],
            document_name: Some("po-2291.pdf".into()),
            document_type: Some("application/pdf".into()),
        })
        .unwrap();

    let stored = app.state.orders.get(&order.id).unwrap().unwrap();
    assert_eq!(stored.document_name.as_deref(), Some("po-2291.pdf"));
    assert_eq!(stored.document_type.as_deref(), Some("application/pdf"));
}

#[test]
fn delete_order_default_policy_keeps_deduction() {
    let app = TestApp::new();
    let item = app.seed_item("Desk Lamp", 5, dec!(10.00));
    let order = app
        .state
        .fulfillment
        .create_order(order_request(vec![OrderLineRequest {
            inventory_id: item.clone(),
            quantity: 3,
        }]))
        .unwrap();

    app.state.fulfillment.delete_order(&order.id).unwrap();

    assert!(app.state.orders.list().unwrap().is_empty());
    assert_eq!(app.state.inventory.get(&item).unwrap().unwrap().quantity, 2);
}

#[test]
fn delete_order_restock_policy_returns_stock() {
    let app = TestApp::with_config(AppConfig {
        seed_on_empty: false,
        restock_on_delete: true,
        ..AppConfig::default()
    });
    let item = app.seed_item("Desk Lamp", 5, dec!(10.00));
    let order = app
        .state
        .fulfillment
        .create_order(order_request(vec![OrderLineRequest {
            inventory_id: item.clone(),
            quantity: 5,
        }]))
        .unwrap();

    assert_eq!(
        app.state.inventory.get(&item).unwrap().unwrap().status,
        InventoryStatus::OutOfStock
    );

    app.state.fulfillment.delete_order(&order.id).unwrap();

    let record = app.state.inventory.get(&item).unwrap().unwrap();
    assert_eq!(record.quantity, 5);
    assert_eq!(record.status, InventoryStatus::LowStock);
}

#[test]
fn concurrent_orders_never_oversell() {
    let app = Arc::new(TestApp::new());
    let item = app.seed_item("Desk Lamp", 5, dec!(10.00));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            let item = item.clone();
            thread::spawn(move || {
                app.state
                    .fulfillment
                    .create_order(order_request(vec![OrderLineRequest {
                        inventory_id: item,
                        quantity: 1,
                    }]))
                    .is_ok()
            })
        })
        .collect();

    let fulfilled = handles
        .into_iter()
        .map(|h| h.join())
        .filter(|outcome| matches!(outcome, Ok(true)))
        .count();

    // Five units, eight hopefuls: exactly five orders land and stock ends
    // at zero, never below.
    assert_eq!(fulfilled, 5);
    let record = app.state.inventory.get(&item).unwrap().unwrap();
    assert_eq!(record.quantity, 0);
    assert_eq!(record.status, InventoryStatus::OutOfStock);
    assert_eq!(app.state.orders.list().unwrap().len(), 5);
}
