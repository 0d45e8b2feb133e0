use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle states. Fulfillment only ever produces `Approved`;
/// `Pending` and `Rejected` are reserved for a future approval workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesOrderStatus {
    Pending,
    Approved,
    Rejected,
}

/// One fulfilled line. `item_name` and `unit_price` are snapshots taken at
/// order creation; they do not track later edits to the inventory record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderItem {
    /// Id of the inventory record the stock was deducted from. Not an
    /// ownership edge; it survives deletion of the record.
    pub inventory_id: String,

    pub item_name: String,

    pub quantity: u32,

    pub unit_price: Decimal,
}

impl SalesOrderItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A fulfilled sales order. Created once by the fulfillment engine, never
/// updated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    /// Human-readable token, e.g. `SO-4F7Q2A`.
    pub id: String,

    /// Denormalized owner reference, by value.
    pub user_id: String,

    pub username: String,

    pub items: Vec<SalesOrderItem>,

    /// Sum of line totals, fixed at creation.
    pub total_amount: Decimal,

    pub status: SalesOrderStatus,

    pub created_at: DateTime<Utc>,

    /// Attachment metadata only; no binary content is persisted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
}

impl SalesOrder {
    /// Generate a fresh `SO-XXXXXX` order token.
    pub fn generate_id() -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(|b| (b as char).to_ascii_uppercase())
            .collect();
        format!("SO-{}", token)
    }

    /// Sum of line totals.
    pub fn compute_total(items: &[SalesOrderItem]) -> Decimal {
        items.iter().map(SalesOrderItem::line_total).sum()
    }
}
