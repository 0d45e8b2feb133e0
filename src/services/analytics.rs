use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::ServiceError;
use crate::models::{InventoryStatus, SalesOrder, SalesOrderStatus};
use crate::repositories::{InventoryRepository, OrderRepository};

/// Trend bucketing granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Inclusive timestamp range filter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformerStat {
    pub name: String,
    pub amount: Decimal,
}

/// Aggregate sales performance over the matching Approved orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub total_sales: Decimal,
    pub order_count: usize,
    /// Zero when there are no matching orders.
    pub avg_order_value: Decimal,
    pub total_quantity: u64,
    pub top_performer: Option<PerformerStat>,
    pub low_performer: Option<PerformerStat>,
}

/// One trend bucket: a label plus the sales it aggregates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub name: String,
    pub amount: Decimal,
    pub count: usize,
}

/// Inventory summary for the dashboard landing view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_records: usize,
    /// Records touched today (by `last_updated`).
    pub today_entries: usize,
    /// Sum of quantity times unit price over the whole inventory.
    pub total_value: Decimal,
    /// Low-stock plus out-of-stock records.
    pub low_stock_items: usize,
}

/// Read-only aggregation over the persisted collections. Only Approved
/// orders count toward sales figures.
#[derive(Clone)]
pub struct AnalyticsService {
    orders: OrderRepository,
    inventory: InventoryRepository,
}

impl AnalyticsService {
    pub fn new(orders: OrderRepository, inventory: InventoryRepository) -> Self {
        Self { orders, inventory }
    }

    /// Performance aggregates, optionally filtered by owner and date range.
    #[instrument(skip(self))]
    pub fn get_performance_stats(
        &self,
        user_id: Option<&str>,
        range: Option<&DateRange>,
    ) -> Result<PerformanceStats, ServiceError> {
        let orders = self.approved_orders(user_id)?;
        let filtered: Vec<&SalesOrder> = orders
            .iter()
            .filter(|o| range.map_or(true, |r| r.contains(o.created_at)))
            .collect();

        let total_sales: Decimal = filtered.iter().map(|o| o.total_amount).sum();
        let total_quantity: u64 = filtered
            .iter()
            .map(|o| o.items.iter().map(|i| u64::from(i.quantity)).sum::<u64>())
            .sum();
        let order_count = filtered.len();
        let avg_order_value = if order_count > 0 {
            total_sales / Decimal::from(order_count as u64)
        } else {
            Decimal::ZERO
        };

        // Per-username totals in first-seen order; the stable descending
        // sort keeps ties in that order.
        let mut by_username: Vec<PerformerStat> = Vec::new();
        for order in &filtered {
            match by_username.iter_mut().find(|p| p.name == order.username) {
                Some(performer) => performer.amount += order.total_amount,
                None => by_username.push(PerformerStat {
                    name: order.username.clone(),
                    amount: order.total_amount,
                }),
            }
        }
        by_username.sort_by(|a, b| b.amount.cmp(&a.amount));

        Ok(PerformanceStats {
            total_sales,
            order_count,
            avg_order_value,
            total_quantity,
            top_performer: by_username.first().cloned(),
            low_performer: by_username.last().cloned(),
        })
    }

    /// Time-bucketed sales series. Buckets are emitted in first-seen order,
    /// not chronologically; the consuming chart renders them as encountered.
    #[instrument(skip(self))]
    pub fn get_sales_trend_data(
        &self,
        timeframe: Timeframe,
        user_id: Option<&str>,
    ) -> Result<Vec<TrendPoint>, ServiceError> {
        let orders = self.approved_orders(user_id)?;

        let mut buckets: Vec<TrendPoint> = Vec::new();
        for order in &orders {
            let name = bucket_label(timeframe, order.created_at);
            match buckets.iter_mut().find(|b| b.name == name) {
                Some(bucket) => {
                    bucket.amount += order.total_amount;
                    bucket.count += 1;
                }
                None => buckets.push(TrendPoint {
                    name,
                    amount: order.total_amount,
                    count: 1,
                }),
            }
        }
        Ok(buckets)
    }

    /// Inventory summary for the dashboard landing view.
    #[instrument(skip(self))]
    pub fn get_dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let records = self.inventory.list()?;
        let today = Utc::now().date_naive();

        Ok(DashboardStats {
            total_records: records.len(),
            today_entries: records
                .iter()
                .filter(|r| r.last_updated.date_naive() == today)
                .count(),
            total_value: records.iter().map(|r| r.stock_value()).sum(),
            low_stock_items: records
                .iter()
                .filter(|r| {
                    matches!(
                        r.status,
                        InventoryStatus::LowStock | InventoryStatus::OutOfStock
                    )
                })
                .count(),
        })
    }

    fn approved_orders(&self, user_id: Option<&str>) -> Result<Vec<SalesOrder>, ServiceError> {
        Ok(self
            .orders
            .list()?
            .into_iter()
            .filter(|o| o.status == SalesOrderStatus::Approved)
            .filter(|o| user_id.map_or(true, |id| o.user_id == id))
            .collect())
    }
}

/// Map a timestamp to its bucket label.
fn bucket_label(timeframe: Timeframe, at: DateTime<Utc>) -> String {
    match timeframe {
        Timeframe::Daily => at.format("%-d %b").to_string(),
        Timeframe::Weekly => {
            // Week number from day-of-year plus the weekday offset of the
            // date itself, counting weeks from Sunday.
            let n = at.weekday().num_days_from_sunday() + 1 + at.ordinal0();
            format!("Week {}", (n + 6) / 7)
        }
        Timeframe::Monthly => at.format("%b %y").to_string(),
        Timeframe::Yearly => at.format("%Y").to_string(),
    }
}
