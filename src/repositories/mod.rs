//! Data access layer: one repository per collection, all speaking JSON
//! arrays over the [`KeyValueStore`](crate::store::KeyValueStore).

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ServiceError;
use crate::store::KeyValueStore;

pub mod inventory_repository;
pub mod order_repository;
pub mod user_repository;

pub use inventory_repository::{
    CreateInventoryRequest, InventoryRepository, UpdateInventoryRequest,
};
pub use order_repository::OrderRepository;
pub use user_repository::{CreateUserRequest, UpdateUserRequest, UserRepository};

/// Fixed storage keys. Three independently keyed collections; nothing else
/// is persisted.
pub const INVENTORY_STORAGE_KEY: &str = "nexgen_inventory_data";
pub const USER_STORAGE_KEY: &str = "nexgen_system_users";
pub const ORDER_STORAGE_KEY: &str = "nexgen_sales_orders";

/// Decode a collection from the store. `None` means the key has never been
/// written; callers decide whether that seeds or yields an empty list.
pub(crate) fn read_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<Vec<T>>, ServiceError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and persist a full collection under its key.
pub(crate) fn write_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), ServiceError> {
    let raw = serde_json::to_string(items)?;
    store.set(key, &raw)?;
    Ok(())
}
