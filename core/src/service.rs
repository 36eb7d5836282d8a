use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::alerts::{classify_expiry, classify_low_stock};
use crate::clock::Clock;
use crate::error::StoreError;
use crate::insights::generate_insights;
use crate::models::{AnalyticsReport, InventoryAlerts, UserProfile};
use crate::nutrition::summarize;
use crate::store::{DEFAULT_PRODUCT_LIMIT, HealthStore};

/// Wires the persistence collaborator to the analytics functions for the
/// summary and inventory-alert endpoints. Holds no mutable state.
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn HealthStore>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn HealthStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Nutrition summary and insights over the trailing `window_days`.
    ///
    /// A missing profile is not an error: insights are computed against an
    /// empty profile and `profile` is `None` in the report.
    #[instrument(skip(self))]
    pub fn analytics_summary(
        &self,
        owner_id: &str,
        window_days: u32,
    ) -> Result<AnalyticsReport, StoreError> {
        let profile = self.store.fetch_profile(owner_id).inspect_err(|e| {
            warn!(error = %e, "profile fetch failed");
        })?;
        let products = self
            .store
            .fetch_recent_products(owner_id, Some(DEFAULT_PRODUCT_LIMIT))
            .inspect_err(|e| {
                warn!(error = %e, "product fetch failed");
            })?;

        let now = self.clock.now();
        let summary = summarize(&products, window_days, now);
        let insights = match &profile {
            Some(p) => generate_insights(p, &summary),
            None => generate_insights(&UserProfile::default(), &summary),
        };

        debug!(
            records = summary.record_count,
            insights = insights.len(),
            has_profile = profile.is_some(),
            "analytics summary computed"
        );

        Ok(AnalyticsReport {
            summary,
            insights,
            profile,
        })
    }

    #[instrument(skip(self))]
    pub fn inventory_alerts(&self, owner_id: &str) -> Result<InventoryAlerts, StoreError> {
        let inventory = self.store.fetch_inventory(owner_id).inspect_err(|e| {
            warn!(error = %e, "inventory fetch failed");
        })?;

        let now = self.clock.now();
        let alerts = InventoryAlerts {
            expiring_items: classify_expiry(&inventory, now),
            low_stock_items: classify_low_stock(&inventory),
        };

        debug!(
            items = inventory.len(),
            expiring = alerts.expiring_items.len(),
            low_stock = alerts.low_stock_items.len(),
            "inventory alerts computed"
        );

        Ok(alerts)
    }
}
