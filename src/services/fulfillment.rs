use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::{Validate, ValidationError};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{SalesOrder, SalesOrderItem, SalesOrderStatus};
use crate::repositories::{InventoryRepository, OrderRepository};

/// One requested line: which record to draw from and how much.
/// Item name and price are snapshotted from the record at fulfillment time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub inventory_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(
        length(min = 1, message = "Order must contain at least one line item"),
        custom = "validate_line_quantities"
    )]
    pub items: Vec<OrderLineRequest>,
    /// Attachment metadata only.
    pub document_name: Option<String>,
    pub document_type: Option<String>,
}

fn validate_line_quantities(items: &[OrderLineRequest]) -> Result<(), ValidationError> {
    if items.iter().any(|line| line.quantity == 0) {
        let mut err = ValidationError::new("quantity");
        err.message = Some("Line quantities must be at least 1".into());
        return Err(err);
    }
    Ok(())
}

/// The order fulfillment engine: validate-then-deduct across the inventory
/// and order collections, atomic from the caller's point of view.
///
/// The store has no transactions, so the whole operation runs under one
/// critical section per service instance; concurrent callers cannot both
/// validate against the same stale quantity.
#[derive(Clone)]
pub struct FulfillmentService {
    inventory: InventoryRepository,
    orders: OrderRepository,
    event_sender: Option<EventSender>,
    restock_on_delete: bool,
    lock: Arc<Mutex<()>>,
}

impl FulfillmentService {
    pub fn new(
        inventory: InventoryRepository,
        orders: OrderRepository,
        event_sender: Option<EventSender>,
        restock_on_delete: bool,
    ) -> Self {
        Self {
            inventory,
            orders,
            event_sender,
            restock_on_delete,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Fulfill a proposed order.
    ///
    /// Phase 1 checks that every line, including repeated lines against the
    /// same record, is covered by on-hand stock; any shortfall rejects the
    /// whole batch with no mutation. Phase 2 deducts stock, recomputes the
    /// derived statuses, persists the inventory collection, then persists
    /// the new order prepended to the order collection (most recent first).
    #[instrument(skip(self, request), fields(user_id = %request.user_id, lines = request.items.len()))]
    pub fn create_order(&self, request: CreateOrderRequest) -> Result<SalesOrder, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.inventory.list()?;

        // Validation phase. Requirements are summed per record so a batch
        // that references the same item twice cannot oversell it.
        let mut required: HashMap<&str, u32> = HashMap::new();
        for line in &request.items {
            let entry = required.entry(line.inventory_id.as_str()).or_insert(0);
            *entry = entry.saturating_add(line.quantity);
        }
        for (inventory_id, quantity) in &required {
            match records.iter().find(|r| r.id == *inventory_id) {
                Some(record) if record.quantity >= *quantity => {}
                Some(record) => {
                    warn!(inventory_id = %inventory_id, available = record.quantity, requested = *quantity, "Order rejected: insufficient stock");
                    return Err(ServiceError::insufficient_stock(&record.item_name));
                }
                None => {
                    warn!(inventory_id = %inventory_id, "Order rejected: unknown inventory record");
                    return Err(ServiceError::insufficient_stock(*inventory_id));
                }
            }
        }

        // Execution phase. Every line is now known to be covered.
        let mut items = Vec::with_capacity(request.items.len());
        let mut adjustments = Vec::with_capacity(request.items.len());
        for line in &request.items {
            if let Some(record) = records.iter_mut().find(|r| r.id == line.inventory_id) {
                let old_quantity = record.quantity;
                record.set_quantity(old_quantity - line.quantity);
                items.push(SalesOrderItem {
                    inventory_id: record.id.clone(),
                    item_name: record.item_name.clone(),
                    quantity: line.quantity,
                    unit_price: record.unit_price,
                });
                adjustments.push(Event::InventoryAdjusted {
                    inventory_id: record.id.clone(),
                    old_quantity,
                    new_quantity: record.quantity,
                });
            }
        }

        self.inventory.save_all(&records)?;

        let order = SalesOrder {
            id: SalesOrder::generate_id(),
            user_id: request.user_id,
            username: request.username,
            total_amount: SalesOrder::compute_total(&items),
            items,
            status: SalesOrderStatus::Approved,
            created_at: Utc::now(),
            document_name: request.document_name,
            document_type: request.document_type,
        };
        self.orders.insert_first(order.clone())?;

        info!(order_id = %order.id, total_amount = %order.total_amount, "Order fulfilled");

        for adjustment in adjustments {
            self.emit(adjustment);
        }
        self.emit(Event::OrderCreated {
            order_id: order.id.clone(),
            user_id: order.user_id.clone(),
            total_amount: order.total_amount,
        });

        Ok(order)
    }

    /// Delete an order record. Absent ids are a silent no-op.
    ///
    /// By default deletion is "hide from ledger": inventory is untouched.
    /// With the `restock_on_delete` policy enabled, ordered quantities are
    /// added back to the surviving inventory records (records deleted since
    /// the order was placed are skipped).
    #[instrument(skip(self), fields(order_id = %id))]
    pub fn delete_order(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut orders = self.orders.list()?;
        let Some(position) = orders.iter().position(|o| o.id == id) else {
            return Ok(());
        };
        let order = orders.remove(position);
        self.orders.save_all(&orders)?;

        let mut restocked = false;
        if self.restock_on_delete {
            let mut records = self.inventory.list()?;
            for item in &order.items {
                if let Some(record) = records.iter_mut().find(|r| r.id == item.inventory_id) {
                    record.set_quantity(record.quantity.saturating_add(item.quantity));
                    restocked = true;
                }
            }
            if restocked {
                self.inventory.save_all(&records)?;
            }
        }

        info!(restocked, "Order deleted");
        self.emit(Event::OrderDeleted {
            order_id: order.id,
            restocked,
        });
        Ok(())
    }

    fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event) {
                warn!(error = %e, "Failed to send event");
            }
        }
    }
}
