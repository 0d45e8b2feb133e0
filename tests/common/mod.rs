//! Shared test harness: an `AppState` wired over a fresh in-memory store.

use std::sync::Arc;

use nexgen_core::config::AppConfig;
use nexgen_core::repositories::CreateInventoryRequest;
use nexgen_core::store::MemoryStore;
use nexgen_core::AppState;
use rust_decimal::Decimal;

pub struct TestApp {
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    /// Empty store, seeding disabled, so every test starts from nothing.
    pub fn new() -> Self {
        Self::with_config(AppConfig {
            seed_on_empty: false,
            ..AppConfig::default()
        })
    }

    /// Store that serves the fixed bootstrap rows.
    pub fn seeded() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            state: AppState::new(store, config),
        }
    }

    /// Create an inventory record and return its id.
    pub fn seed_item(&self, item_name: &str, quantity: u32, unit_price: Decimal) -> String {
        self.state
            .inventory
            .create(CreateInventoryRequest {
                item_name: item_name.into(),
                category: "Test".into(),
                location: "Bay 1".into(),
                quantity,
                unit_price,
            })
            .expect("seed inventory record")
            .id
    }
}
