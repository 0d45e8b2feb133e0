use std::sync::Arc;

use tracing::instrument;

use crate::errors::ServiceError;
use crate::models::SalesOrder;
use crate::store::KeyValueStore;

use super::{read_collection, write_collection, ORDER_STORAGE_KEY};

/// Repository for the sales-order collection. Orders are written once by the
/// fulfillment engine and never updated in place, so there is no update path
/// here. The collection is kept most-recent-first.
#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn KeyValueStore>,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All orders, most recent first. There is no seed set for orders; an
    /// unwritten store is simply empty.
    pub fn list(&self) -> Result<Vec<SalesOrder>, ServiceError> {
        Ok(read_collection(self.store.as_ref(), ORDER_STORAGE_KEY)?.unwrap_or_default())
    }

    pub fn get(&self, id: &str) -> Result<Option<SalesOrder>, ServiceError> {
        Ok(self.list()?.into_iter().find(|o| o.id == id))
    }

    /// Prepend a freshly created order, keeping most-recent-first ordering.
    pub(crate) fn insert_first(&self, order: SalesOrder) -> Result<(), ServiceError> {
        let mut orders = self.list()?;
        orders.insert(0, order);
        self.save_all(&orders)
    }

    /// Remove an order record. Absent ids leave the collection unchanged.
    /// Restocking policy lives in the fulfillment engine, not here.
    #[instrument(skip(self), fields(order_id = %id))]
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut orders = self.list()?;
        orders.retain(|o| o.id != id);
        self.save_all(&orders)
    }

    pub(crate) fn save_all(&self, orders: &[SalesOrder]) -> Result<(), ServiceError> {
        write_collection(self.store.as_ref(), ORDER_STORAGE_KEY, orders)
    }
}
