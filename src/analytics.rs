//! Order analytics
//!
//! Aggregations behind the order dashboard: revenue per calendar month and
//! order counts per status.

use std::{fmt, fs, path::Path};

use jiff::{Timestamp, tz::TimeZone};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or aggregating orders.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// IO error reading an orders file
    #[error("failed to read orders file: {0}")]
    Io(#[from] std::io::Error),

    /// Orders JSON could not be parsed
    #[error("failed to parse orders: {0}")]
    Json(#[from] serde_json::Error),

    /// Summed revenue overflowed
    #[error("revenue overflowed for {year}-{month:02}")]
    Overflow {
        /// Calendar year
        year: i16,
        /// Calendar month
        month: i8,
    },
}

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting processing
    Pending,
    /// Being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled before delivery
    Cancelled,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Lowercase label used on the wire.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An order as returned by the orders API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    pub id: String,

    /// Fulfilment status
    pub status: OrderStatus,

    /// When the order was placed
    pub placed_at: Timestamp,

    /// Grand total in minor units
    pub total: u64,
}

/// Orders and revenue for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyRevenue {
    /// Calendar year
    pub year: i16,

    /// Calendar month, 1-12
    pub month: i8,

    /// Orders placed in the month, cancelled ones included
    pub orders: usize,

    /// Revenue in minor units, cancelled orders excluded
    pub revenue: u64,
}

/// Read a JSON array of orders from a file.
///
/// # Errors
///
/// Returns an [`AnalyticsError`] if the file cannot be read or parsed.
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<Order>, AnalyticsError> {
    let raw = fs::read_to_string(path)?;

    Ok(serde_json::from_str(&raw)?)
}

/// Group orders by the UTC calendar month they were placed in.
///
/// Months are returned in chronological order; months without orders are omitted.
///
/// # Errors
///
/// Returns [`AnalyticsError::Overflow`] if a month's revenue overflows.
pub fn revenue_by_month(orders: &[Order]) -> Result<Vec<MonthlyRevenue>, AnalyticsError> {
    let mut months: FxHashMap<(i16, i8), MonthlyRevenue> = FxHashMap::default();

    for order in orders {
        let placed = order.placed_at.to_zoned(TimeZone::UTC);
        let (year, month) = (placed.year(), placed.month());

        let entry = months.entry((year, month)).or_insert(MonthlyRevenue {
            year,
            month,
            orders: 0,
            revenue: 0,
        });

        entry.orders += 1;

        if order.status != OrderStatus::Cancelled {
            entry.revenue = entry
                .revenue
                .checked_add(order.total)
                .ok_or(AnalyticsError::Overflow { year, month })?;
        }
    }

    let mut months: Vec<MonthlyRevenue> = months.into_values().collect();

    months.sort_unstable_by_key(|month| (month.year, month.month));

    Ok(months)
}

/// Count orders per status, in lifecycle order, skipping empty statuses.
pub fn count_by_status(orders: &[Order]) -> Vec<(OrderStatus, usize)> {
    let mut counts: FxHashMap<OrderStatus, usize> = FxHashMap::default();

    for order in orders {
        *counts.entry(order.status).or_default() += 1;
    }

    OrderStatus::ALL
        .into_iter()
        .filter_map(|status| counts.get(&status).map(|count| (status, *count)))
        .collect()
}
