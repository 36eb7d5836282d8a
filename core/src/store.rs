use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{
    InventoryRecord, NutritionRecord, UserProfile, validate_inventory_record,
    validate_nutrition_record, validate_profile,
};

/// Products considered by the analytics summary when no limit is given.
pub const DEFAULT_PRODUCT_LIMIT: usize = 100;

pub const SNAPSHOT_VERSION: i64 = 1;

/// Read side of the persistence layer.
///
/// Implementations must return products newest-first by `recorded_at`
/// (truncated to `limit`) and inventory newest-first by `created_at`.
/// Calls are synchronous and may block.
pub trait HealthStore: Send + Sync {
    fn fetch_recent_products(
        &self,
        owner_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<NutritionRecord>, StoreError>;
    fn fetch_profile(&self, owner_id: &str) -> Result<Option<UserProfile>, StoreError>;
    fn fetch_inventory(&self, owner_id: &str) -> Result<Vec<InventoryRecord>, StoreError>;
}

/// Exported state of the persistence layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: i64,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profiles: Vec<UserProfile>,
    #[serde(default)]
    pub products: Vec<NutritionRecord>,
    #[serde(default)]
    pub inventory: Vec<InventoryRecord>,
}

/// Read-only [`HealthStore`] over a validated [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshot: Snapshot,
}

impl SnapshotStore {
    /// Validate every record and re-derive each profile's `bmr`.
    pub fn from_snapshot(mut snapshot: Snapshot) -> Result<Self> {
        if snapshot.version > SNAPSHOT_VERSION {
            bail!(
                "Unsupported snapshot version {} (newest supported: {SNAPSHOT_VERSION})",
                snapshot.version
            );
        }
        for profile in &mut snapshot.profiles {
            validate_profile(profile)
                .with_context(|| format!("Invalid profile '{}'", profile.id))?;
            profile.refresh_bmr();
        }
        for product in &snapshot.products {
            validate_nutrition_record(product)
                .with_context(|| format!("Invalid product '{}'", product.id))?;
        }
        for item in &snapshot.inventory {
            validate_inventory_record(item)
                .with_context(|| format!("Invalid inventory item '{}'", item.id))?;
        }
        Ok(Self { snapshot })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).context("Malformed snapshot JSON")?;
        Self::from_snapshot(snapshot)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to load snapshot: {}", path.display()))
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl HealthStore for SnapshotStore {
    fn fetch_recent_products(
        &self,
        owner_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<NutritionRecord>, StoreError> {
        let mut products: Vec<NutritionRecord> = self
            .snapshot
            .products
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        if let Some(limit) = limit {
            products.truncate(limit);
        }
        Ok(products)
    }

    fn fetch_profile(&self, owner_id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .snapshot
            .profiles
            .iter()
            .find(|p| p.id == owner_id)
            .cloned())
    }

    fn fetch_inventory(&self, owner_id: &str) -> Result<Vec<InventoryRecord>, StoreError> {
        let mut items: Vec<InventoryRecord> = self
            .snapshot
            .inventory
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT_JSON: &str = r#"{
        "version": 1,
        "exported_at": "2024-06-15T12:00:00Z",
        "profiles": [
            {
                "id": "u1",
                "name": "Sam",
                "age": 30,
                "weight_kg": 70.0,
                "height_cm": 175.0,
                "gender": "male",
                "activity_level": "moderate",
                "goals": ["Muscle Building"],
                "bmr": 1
            }
        ],
        "products": [
            {"id": "p1", "owner_id": "u1", "calories": 100, "protein_g": 10, "carbs_g": 20, "fat_g": 5, "recorded_at": "2024-06-10T08:00:00Z"},
            {"id": "p2", "owner_id": "u1", "calories": 200, "protein_g": 20, "carbs_g": 10, "fat_g": 15, "recorded_at": "2024-06-14T08:00:00Z"},
            {"id": "p3", "owner_id": "u2", "calories": 300, "protein_g": 30, "carbs_g": 30, "fat_g": 30, "recorded_at": "2024-06-14T09:00:00Z"},
            {"id": "p4", "owner_id": "u1", "calories": 50, "protein_g": 1, "carbs_g": 1, "fat_g": 1, "recorded_at": "2024-06-12T08:00:00Z"}
        ],
        "inventory": [
            {"id": "i1", "owner_id": "u1", "name": "Milk", "quantity": 1, "expiry": "2024-06-16T12:00:00Z", "created_at": "2024-06-01T00:00:00Z"},
            {"id": "i2", "owner_id": "u1", "name": "Rice", "quantity": 5, "expiry": "2024-12-01T00:00:00Z", "created_at": "2024-06-05T00:00:00Z"},
            {"id": "i3", "owner_id": "u2", "name": "Oats", "quantity": 1, "expiry": "2024-06-16T00:00:00Z", "created_at": "2024-06-05T00:00:00Z"}
        ]
    }"#;

    #[test]
    fn test_load_recomputes_bmr() {
        let store = SnapshotStore::from_json(SNAPSHOT_JSON).unwrap();
        let profile = store.fetch_profile("u1").unwrap().unwrap();
        assert_eq!(profile.bmr, Some(2555));
        assert!(store.fetch_profile("nobody").unwrap().is_none());
    }

    #[test]
    fn test_blank_gender_clears_stored_bmr() {
        let json = r#"{
            "version": 1,
            "profiles": [
                {"id": "u9", "age": 30, "weight_kg": 70.0, "height_cm": 175.0, "gender": " ", "activity_level": "moderate", "bmr": 2298}
            ]
        }"#;
        let store = SnapshotStore::from_json(json).unwrap();
        let profile = store.fetch_profile("u9").unwrap().unwrap();
        assert!(profile.gender.is_none());
        assert!(profile.bmr.is_none());
    }

    #[test]
    fn test_products_newest_first_and_limited() {
        let store = SnapshotStore::from_json(SNAPSHOT_JSON).unwrap();
        let products = store.fetch_recent_products("u1", None).unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p4", "p1"]);

        let limited = store.fetch_recent_products("u1", Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, "p2");
    }

    #[test]
    fn test_inventory_filtered_by_owner() {
        let store = SnapshotStore::from_json(SNAPSHOT_JSON).unwrap();
        let items = store.fetch_inventory("u1").unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i2", "i1"]);
        assert!(store.fetch_inventory("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_negative_nutrition() {
        let json = r#"{
            "version": 1,
            "products": [
                {"id": "bad", "owner_id": "u1", "calories": -5, "protein_g": 0, "carbs_g": 0, "fat_g": 0, "recorded_at": "2024-06-10T08:00:00Z"}
            ]
        }"#;
        let err = SnapshotStore::from_json(json).unwrap_err();
        assert!(format!("{err:#}").contains("bad"));
    }

    #[test]
    fn test_rejects_future_version() {
        let json = r#"{"version": 99}"#;
        assert!(SnapshotStore::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(SnapshotStore::from_json("{not json").is_err());
    }

    #[test]
    fn test_open_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT_JSON.as_bytes()).unwrap();
        let store = SnapshotStore::open(file.path()).unwrap();
        assert_eq!(store.snapshot().profiles.len(), 1);
        assert_eq!(store.snapshot().products.len(), 4);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapshotStore::open(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read snapshot"));
    }
}
