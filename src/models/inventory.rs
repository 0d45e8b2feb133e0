use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantity above which a record counts as fully stocked. At or below it the
/// record is low stock; at zero it is out of stock.
pub const IN_STOCK_THRESHOLD: u32 = 10;

/// Stock level bucket, derived from `quantity`, never set directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum InventoryStatus {
    #[serde(rename = "In Stock")]
    #[strum(serialize = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    #[strum(serialize = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    #[strum(serialize = "Out of Stock")]
    OutOfStock,
}

impl InventoryStatus {
    /// The one quantity-to-status mapping. Every mutation path goes through
    /// here; callers cannot desync `status` from `quantity`.
    pub fn for_quantity(quantity: u32) -> Self {
        if quantity > IN_STOCK_THRESHOLD {
            InventoryStatus::InStock
        } else if quantity > 0 {
            InventoryStatus::LowStock
        } else {
            InventoryStatus::OutOfStock
        }
    }
}

/// A stocked item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    /// Unique identifier for the record.
    pub id: String,

    /// Display name of the item.
    pub item_name: String,

    /// Free-text category, e.g. "Electronics".
    pub category: String,

    /// Free-text storage location, e.g. "Floor 1 - Section A".
    pub location: String,

    /// Units on hand. Never goes negative; the fulfillment engine rejects
    /// orders it cannot cover.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Decimal,

    /// Derived stock bucket; recomputed whenever `quantity` changes.
    pub status: InventoryStatus,

    /// Set on every create and update.
    pub last_updated: DateTime<Utc>,
}

impl InventoryRecord {
    /// Apply a new quantity, recomputing the derived status and refreshing
    /// the update timestamp.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.status = InventoryStatus::for_quantity(quantity);
        self.last_updated = Utc::now();
    }

    /// Total value of the units on hand.
    pub fn stock_value(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
