use chrono::{DateTime, Duration, Utc};

use crate::models::{AlertLevel, ExpiryAlert, InventoryRecord, LowStockAlert};

/// Items expiring within this many whole days are reported.
pub const EXPIRY_HORIZON_DAYS: i64 = 3;
/// At or below this many days the alert is urgent.
pub const URGENT_WITHIN_DAYS: i64 = 1;

/// Whole days from `now` until `expiry`, rounded toward negative infinity.
#[must_use]
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let delta = expiry - now;
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Items expiring in `0..=3` whole days, earliest first. Ties keep input order.
#[must_use]
pub fn classify_expiry(items: &[InventoryRecord], now: DateTime<Utc>) -> Vec<ExpiryAlert> {
    let mut alerts: Vec<ExpiryAlert> = items
        .iter()
        .filter_map(|item| {
            let days = days_until(item.expiry, now);
            if !(0..=EXPIRY_HORIZON_DAYS).contains(&days) {
                return None;
            }
            let level = if days <= URGENT_WITHIN_DAYS {
                AlertLevel::Urgent
            } else {
                AlertLevel::Warning
            };
            Some(ExpiryAlert {
                item: item.clone(),
                days_until_expiry: days,
                level,
            })
        })
        .collect();

    alerts.sort_by_key(|a| a.days_until_expiry);
    alerts
}

/// Items whose quantity is at or below their threshold, in input order.
#[must_use]
pub fn classify_low_stock(items: &[InventoryRecord]) -> Vec<LowStockAlert> {
    items
        .iter()
        .filter(|item| item.quantity <= item.threshold())
        .map(|item| LowStockAlert {
            item: item.clone(),
            current_quantity: item.quantity,
            threshold: item.threshold(),
        })
        .collect()
}
