use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain events emitted by the engines. Consumers subscribe by holding the
/// receiving end of the channel; services never block on delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderCreated {
        order_id: String,
        user_id: String,
        total_amount: rust_decimal::Decimal,
    },
    OrderDeleted {
        order_id: String,
        restocked: bool,
    },

    // Inventory events
    InventoryAdjusted {
        inventory_id: String,
        old_quantity: u32,
        new_quantity: u32,
    },

    // User events
    UserAuthenticated {
        user_id: String,
        at: DateTime<Utc>,
    },
}

/// Sending half of the event channel handed to services at construction.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: crossbeam_channel::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: crossbeam_channel::Sender<Event>) -> Self {
        Self { sender }
    }

    /// An unbounded channel pair for wiring an `AppState` to a consumer.
    pub fn unbounded() -> (Self, crossbeam_channel::Receiver<Event>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }

    /// Send an event. Delivery failure (all receivers dropped) is reported,
    /// never propagated: event emission must not fail a mutation that has
    /// already been persisted.
    pub fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}
