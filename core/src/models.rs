use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::energy::compute_energy;

/// Inventory items at or below this quantity are flagged when no threshold is set.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 2.0;

/// Longest trailing window the analytics endpoints accept.
pub const MAX_WINDOW_DAYS: u32 = 365;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

// --- Profile enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Other,
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for Gender {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::Other
        }
    }
}

impl Gender {
    /// Blank input means the gender is unknown.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            None
        } else {
            Some(Self::from(value))
        }
    }
}

fn deserialize_gender<'de, D>(deserializer: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Gender::parse))
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        match value {
            Gender::Male => "male".to_string(),
            Gender::Other => "other".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Active,
        Self::VeryActive,
    ];

    /// Case-insensitive lookup. Unknown names yield `None`, which the energy
    /// calculator treats as moderate.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sedentary" => Some(Self::Sedentary),
            "light" => Some(Self::Light),
            "moderate" => Some(Self::Moderate),
            "active" => Some(Self::Active),
            "very_active" => Some(Self::VeryActive),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }
}

fn deserialize_activity<'de, D>(deserializer: D) -> Result<Option<ActivityLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ActivityLevel::parse))
}

/// A profile goal. Only the two named goals drive insights; anything else is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goal {
    WeightLoss,
    MuscleBuilding,
    Other(String),
}

impl From<String> for Goal {
    fn from(value: String) -> Self {
        // Exact, case-sensitive match.
        match value.as_str() {
            "Weight Loss" => Self::WeightLoss,
            "Muscle Building" => Self::MuscleBuilding,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Goal {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Goal> for String {
    fn from(value: Goal) -> Self {
        match value {
            Goal::WeightLoss => "Weight Loss".to_string(),
            Goal::MuscleBuilding => "Muscle Building".to_string(),
            Goal::Other(s) => s,
        }
    }
}

// --- Profile ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_gender")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "deserialize_activity")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub goals: BTreeSet<Goal>,
    /// Daily energy requirement derived from the measurements above.
    #[serde(default)]
    pub bmr: Option<i64>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewUserProfile {
    pub name: String,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub dietary_preferences: Vec<String>,
    pub health_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub goals: BTreeSet<Goal>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub dietary_preferences: Option<Vec<String>>,
    pub health_conditions: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub goals: Option<BTreeSet<Goal>>,
}

impl UserProfile {
    #[must_use]
    pub fn create(new: NewUserProfile, now: DateTime<Utc>) -> Self {
        let mut profile = Self {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            age: new.age,
            weight_kg: new.weight_kg,
            height_cm: new.height_cm,
            gender: new.gender,
            activity_level: new.activity_level,
            dietary_preferences: new.dietary_preferences,
            health_conditions: new.health_conditions,
            allergies: new.allergies,
            goals: new.goals,
            bmr: None,
            created_at: now,
            updated_at: now,
        };
        profile.refresh_bmr();
        profile
    }

    pub fn apply_update(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(weight) = update.weight_kg {
            self.weight_kg = Some(weight);
        }
        if let Some(height) = update.height_cm {
            self.height_cm = Some(height);
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
        if let Some(level) = update.activity_level {
            self.activity_level = Some(level);
        }
        if let Some(prefs) = update.dietary_preferences {
            self.dietary_preferences = prefs;
        }
        if let Some(conditions) = update.health_conditions {
            self.health_conditions = conditions;
        }
        if let Some(allergies) = update.allergies {
            self.allergies = allergies;
        }
        if let Some(goals) = update.goals {
            self.goals = goals;
        }
        self.updated_at = now;
        self.refresh_bmr();
    }

    /// Re-derive `bmr` from the current measurements.
    pub fn refresh_bmr(&mut self) {
        self.bmr = compute_energy(
            self.weight_kg,
            self.height_cm,
            self.age,
            self.gender,
            self.activity_level,
        );
    }

    #[must_use]
    pub fn has_goal(&self, goal: &Goal) -> bool {
        self.goals.contains(goal)
    }
}

// --- Scanned products ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    #[default]
    Fresh,
    Aging,
    Spoiled,
}

/// One scanned product instance. Macro units are caller-defined but must be
/// consistent across a set passed to the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    #[serde(default)]
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub sugar_g: f64,
    #[serde(default)]
    pub freshness: FreshnessStatus,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub total_calories: f64,
    pub avg_protein: f64,
    pub avg_carbs: f64,
    pub avg_fat: f64,
    pub record_count: usize,
    pub window_days: u32,
}

// --- Inventory ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    pub expiry: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub added_from_receipt: bool,
    #[serde(default)]
    pub low_stock_threshold: Option<f64>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl InventoryRecord {
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Urgent,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiryAlert {
    pub item: InventoryRecord,
    pub days_until_expiry: i64,
    pub level: AlertLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockAlert {
    pub item: InventoryRecord,
    pub current_quantity: f64,
    pub threshold: f64,
}

// --- Endpoint payloads ---

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub summary: NutritionSummary,
    pub insights: Vec<String>,
    /// Serialized as `{}` when the owner has no profile.
    #[serde(serialize_with = "serialize_profile")]
    pub profile: Option<UserProfile>,
}

#[allow(clippy::ref_option)]
fn serialize_profile<S>(profile: &Option<UserProfile>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match profile {
        Some(p) => p.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryAlerts {
    pub expiring_items: Vec<ExpiryAlert>,
    pub low_stock_items: Vec<LowStockAlert>,
}

// --- Validation ---

pub fn validate_window_days(days: u32) -> Result<u32> {
    if days == 0 || days > MAX_WINDOW_DAYS {
        bail!("Window must be between 1 and {MAX_WINDOW_DAYS} days (got {days})");
    }
    Ok(days)
}

/// Validate a profile: measurements, when present, must be positive.
pub fn validate_profile(profile: &UserProfile) -> Result<()> {
    if profile.weight_kg.is_some_and(|w| w <= 0.0) {
        bail!("weight_kg must be greater than 0");
    }
    if profile.height_cm.is_some_and(|h| h <= 0.0) {
        bail!("height_cm must be greater than 0");
    }
    if profile.age == Some(0) {
        bail!("age must be greater than 0");
    }
    Ok(())
}

/// Validate a scanned product: owner must be set, nutrition must not be negative.
pub fn validate_nutrition_record(record: &NutritionRecord) -> Result<()> {
    if record.owner_id.trim().is_empty() {
        bail!("Product owner_id must not be empty");
    }
    let fields = [
        ("calories", record.calories),
        ("protein_g", record.protein_g),
        ("carbs_g", record.carbs_g),
        ("fat_g", record.fat_g),
        ("fiber_g", record.fiber_g),
        ("sugar_g", record.sugar_g),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            bail!("{name} must be a non-negative number (got {value})");
        }
    }
    Ok(())
}

/// Validate an inventory item: owner must be set, quantity and threshold must not be negative.
pub fn validate_inventory_record(record: &InventoryRecord) -> Result<()> {
    if record.owner_id.trim().is_empty() {
        bail!("Inventory owner_id must not be empty");
    }
    if !record.quantity.is_finite() || record.quantity < 0.0 {
        bail!("quantity must be a non-negative number");
    }
    if record
        .low_stock_threshold
        .is_some_and(|t| !t.is_finite() || t < 0.0)
    {
        bail!("low_stock_threshold must be a non-negative number");
    }
    Ok(())
}
