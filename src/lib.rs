//! NexGen Core Library
//!
//! Embedded inventory, sales-order, and user-management engine. All state
//! lives in a local key-value store; repositories and engines are wired
//! together through an explicit [`AppState`], with no process-wide
//! singletons.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod repositories;
pub mod services;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::repositories::{InventoryRepository, OrderRepository, UserRepository};
use crate::services::{AnalyticsService, FulfillmentService};
use crate::store::{KeyValueStore, RedbStore};

/// One handle per store: the repositories and engines for a profile,
/// constructed over an explicit store instead of hidden global state.
/// Cloning shares the underlying store and the fulfillment critical
/// section.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub inventory: InventoryRepository,
    pub users: UserRepository,
    pub orders: OrderRepository,
    pub fulfillment: FulfillmentService,
    pub analytics: AnalyticsService,
    pub auth: AuthService,
}

impl AppState {
    /// Wire repositories and engines over the given store.
    pub fn new(store: Arc<dyn KeyValueStore>, config: config::AppConfig) -> Self {
        Self::with_events(store, config, None)
    }

    /// Like [`AppState::new`], with a channel for domain events.
    pub fn with_events(
        store: Arc<dyn KeyValueStore>,
        config: config::AppConfig,
        event_sender: Option<EventSender>,
    ) -> Self {
        let inventory = InventoryRepository::new(store.clone(), config.seed_on_empty);
        let users = UserRepository::new(store.clone(), config.seed_on_empty);
        let orders = OrderRepository::new(store.clone());

        let fulfillment = FulfillmentService::new(
            inventory.clone(),
            orders.clone(),
            event_sender.clone(),
            config.restock_on_delete,
        );
        let analytics = AnalyticsService::new(orders.clone(), inventory.clone());
        let auth = AuthService::new(users.clone(), event_sender);

        Self {
            config,
            store,
            inventory,
            users,
            orders,
            fulfillment,
            analytics,
            auth,
        }
    }

    /// Open the persistent store at `config.store_path` and wire an
    /// `AppState` over it.
    pub fn open(config: config::AppConfig) -> Result<Self, ServiceError> {
        let store = RedbStore::open(Path::new(&config.store_path))?;
        Ok(Self::new(Arc::new(store), config))
    }
}
