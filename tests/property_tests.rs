//! Property-based tests for the core invariants.
//!
//! These use proptest to verify the stock-availability rules across a wide
//! range of inputs, helping to catch edge cases that unit tests might miss.

mod common;

use common::TestApp;
use nexgen_core::models::{InventoryStatus, IN_STOCK_THRESHOLD};
use nexgen_core::repositories::UpdateInventoryRequest;
use nexgen_core::services::{CreateOrderRequest, OrderLineRequest};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn price_strategy() -> impl Strategy<Value = Decimal> {
    // Cents up to 10,000.00 with two decimal places.
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn order_request(item: &str, quantity: u32) -> CreateOrderRequest {
    CreateOrderRequest {
        user_id: "user-1".into(),
        username: "John Staff".into(),
        items: vec![OrderLineRequest {
            inventory_id: item.into(),
            quantity,
        }],
        document_name: None,
        document_type: None,
    }
}

// Property: status is a pure function of quantity under the thresholds.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn status_follows_quantity(quantity in 0u32..10_000) {
        let status = InventoryStatus::for_quantity(quantity);
        if quantity == 0 {
            prop_assert_eq!(status, InventoryStatus::OutOfStock);
        } else if quantity <= IN_STOCK_THRESHOLD {
            prop_assert_eq!(status, InventoryStatus::LowStock);
        } else {
            prop_assert_eq!(status, InventoryStatus::InStock);
        }
    }

    #[test]
    fn updates_never_desync_status_from_quantity(initial in 0u32..100, updated in 0u32..100) {
        let app = TestApp::new();
        let id = app.seed_item("Widget", initial, Decimal::new(999, 2));

        app.state.inventory.update(&id, UpdateInventoryRequest {
            quantity: Some(updated),
            ..Default::default()
        }).unwrap();

        let record = app.state.inventory.get(&id).unwrap().unwrap();
        prop_assert_eq!(record.status, InventoryStatus::for_quantity(record.quantity));
    }
}

// Property: fulfillment either succeeds with an exact deduction or fails
// with no inventory change: stock never goes negative.
proptest! {
    #[test]
    fn fulfillment_never_oversells(stock in 0u32..50, requested in 1u32..100) {
        let app = TestApp::new();
        let id = app.seed_item("Widget", stock, Decimal::new(1000, 2));

        let result = app.state.fulfillment.create_order(order_request(&id, requested));
        let record = app.state.inventory.get(&id).unwrap().unwrap();

        if requested <= stock {
            prop_assert!(result.is_ok());
            prop_assert_eq!(record.quantity, stock - requested);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(record.quantity, stock);
            prop_assert!(app.state.orders.list().unwrap().is_empty());
        }
    }

    #[test]
    fn order_total_is_sum_of_line_totals(
        lines in prop::collection::vec((1u32..5, price_strategy()), 1..5)
    ) {
        let app = TestApp::new();
        let requests: Vec<OrderLineRequest> = lines
            .iter()
            .enumerate()
            .map(|(i, (quantity, price))| OrderLineRequest {
                inventory_id: app.seed_item(&format!("Item {}", i), 100, *price),
                quantity: *quantity,
            })
            .collect();

        let order = app.state.fulfillment.create_order(CreateOrderRequest {
            user_id: "user-1".into(),
            username: "John Staff".into(),
            items: requests,
            document_name: None,
            document_type: None,
        }).unwrap();

        let expected: Decimal = lines
            .iter()
            .map(|(quantity, price)| *price * Decimal::from(*quantity))
            .sum();
        prop_assert_eq!(order.total_amount, expected);
    }
}
