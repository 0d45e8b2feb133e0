use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::models::{InventoryRecord, InventoryStatus};
use crate::store::KeyValueStore;

use super::{read_collection, write_collection, INVENTORY_STORAGE_KEY};

/// Fields accepted when creating an inventory record. Identity, timestamps,
/// and the derived status are assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInventoryRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub item_name: String,
    pub category: String,
    pub location: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Shallow-merge update payload. Absent fields keep their stored values.
/// There is deliberately no `status` field: status is derived from the
/// merged quantity and cannot be supplied by a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInventoryRequest {
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<Decimal>,
}

/// Repository for the inventory collection.
#[derive(Clone)]
pub struct InventoryRepository {
    store: Arc<dyn KeyValueStore>,
    seed_on_empty: bool,
}

impl InventoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, seed_on_empty: bool) -> Self {
        Self {
            store,
            seed_on_empty,
        }
    }

    /// All records. An unwritten store yields the seed set without
    /// persisting it; the first mutation writes whatever `list` returned.
    pub fn list(&self) -> Result<Vec<InventoryRecord>, ServiceError> {
        match read_collection(self.store.as_ref(), INVENTORY_STORAGE_KEY)? {
            Some(records) => Ok(records),
            None if self.seed_on_empty => Ok(seed_records()),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<InventoryRecord>, ServiceError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    #[instrument(skip(self, request), fields(item_name = %request.item_name))]
    pub fn create(&self, request: CreateInventoryRequest) -> Result<InventoryRecord, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let mut records = self.list()?;
        let record = InventoryRecord {
            id: Uuid::new_v4().to_string(),
            item_name: request.item_name,
            category: request.category,
            location: request.location,
            quantity: request.quantity,
            unit_price: request.unit_price,
            status: InventoryStatus::for_quantity(request.quantity),
            last_updated: Utc::now(),
        };
        records.push(record.clone());
        self.save_all(&records)?;

        info!(record_id = %record.id, quantity = record.quantity, "Inventory record created");
        Ok(record)
    }

    /// Shallow-merge `updates` into the stored record. The derived status is
    /// always recomputed from the merged quantity, and `last_updated` is
    /// refreshed, including on an empty update. Absent ids are a no-op.
    #[instrument(skip(self, updates), fields(record_id = %id))]
    pub fn update(&self, id: &str, updates: UpdateInventoryRequest) -> Result<(), ServiceError> {
        let mut records = self.list()?;
        for record in records.iter_mut() {
            if record.id != id {
                continue;
            }
            if let Some(item_name) = updates.item_name {
                record.item_name = item_name;
            }
            if let Some(category) = updates.category {
                record.category = category;
            }
            if let Some(location) = updates.location {
                record.location = location;
            }
            if let Some(unit_price) = updates.unit_price {
                record.unit_price = unit_price;
            }
            record.set_quantity(updates.quantity.unwrap_or(record.quantity));
            break;
        }
        self.save_all(&records)
    }

    /// Remove a record. Absent ids leave the collection unchanged.
    #[instrument(skip(self), fields(record_id = %id))]
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut records = self.list()?;
        records.retain(|r| r.id != id);
        self.save_all(&records)
    }

    /// Persist the full collection. The fulfillment engine uses this to
    /// commit a batch of deductions in one write.
    pub(crate) fn save_all(&self, records: &[InventoryRecord]) -> Result<(), ServiceError> {
        write_collection(self.store.as_ref(), INVENTORY_STORAGE_KEY, records)
    }
}

/// Bootstrap rows returned by `list` on a never-written store.
fn seed_records() -> Vec<InventoryRecord> {
    use rust_decimal_macros::dec;

    let now = Utc::now();
    let seed = |id: &str, item_name: &str, category: &str, location: &str, quantity: u32, unit_price: Decimal| {
        InventoryRecord {
            id: id.to_string(),
            item_name: item_name.to_string(),
            category: category.to_string(),
            location: location.to_string(),
            quantity,
            unit_price,
            status: InventoryStatus::for_quantity(quantity),
            last_updated: now,
        }
    };

    vec![
        seed("1", "Ergonomic Desk Chair", "Furniture", "Floor 1 - Section A", 25, dec!(199.99)),
        seed("2", "MacBook Pro 14\"", "Electronics", "Storage C", 3, dec!(2499.00)),
        seed("3", "Wireless Mouse", "Accessories", "Floor 1 - Supply Room", 50, dec!(29.99)),
    ]
}
