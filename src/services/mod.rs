//! Engines layered over the repositories.

pub mod analytics;
pub mod fulfillment;

pub use analytics::{
    AnalyticsService, DashboardStats, DateRange, PerformanceStats, PerformerStat, Timeframe,
    TrendPoint,
};
pub use fulfillment::{CreateOrderRequest, FulfillmentService, OrderLineRequest};
