//! Rule-based nutrition insights.
//!
//! Rules are evaluated in a fixed order and are not exclusive: every rule whose
//! condition holds contributes its message. When nothing fires, a single
//! encouragement message is returned, so the result is never empty.

use crate::models::{Goal, NutritionSummary, UserProfile};

pub const UNDER_EATING: &str = "You might be under-eating. Consider adding healthy, calorie-dense foods like nuts, avocados, or olive oil.";
pub const OVER_EATING: &str = "You're consuming more calories than needed. Focus on portion control and nutrient-dense foods.";
pub const LOW_PROTEIN: &str = "Try to increase your protein intake! Add Greek yogurt, lean meats, or legumes to your meals.";
pub const WEIGHT_LOSS: &str = "For weight loss, focus on high-protein, high-fiber foods that keep you full longer.";
pub const MUSCLE_BUILDING: &str = "Great choice for muscle building! Make sure to have protein within 30 minutes after workouts.";
pub const ENCOURAGEMENT: &str = "You're doing great! Keep focusing on balanced, nutritious meals.";

/// Daily intake below this fraction of the energy requirement counts as under-eating.
pub const UNDER_EATING_RATIO: f64 = 0.8;
/// Daily intake above this fraction of the energy requirement counts as over-eating.
pub const OVER_EATING_RATIO: f64 = 1.3;
/// Absolute grams, independent of body weight.
pub const MIN_AVG_PROTEIN: f64 = 15.0;

#[must_use]
pub fn generate_insights(profile: &UserProfile, summary: &NutritionSummary) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(message) = energy_balance(profile, summary) {
        insights.push(message.to_string());
    }

    if summary.avg_protein < MIN_AVG_PROTEIN {
        insights.push(LOW_PROTEIN.to_string());
    }

    if profile.has_goal(&Goal::WeightLoss) {
        insights.push(WEIGHT_LOSS.to_string());
    }
    if profile.has_goal(&Goal::MuscleBuilding) {
        insights.push(MUSCLE_BUILDING.to_string());
    }

    if insights.is_empty() {
        insights.push(ENCOURAGEMENT.to_string());
    }
    insights
}

#[allow(clippy::cast_precision_loss)]
fn energy_balance(profile: &UserProfile, summary: &NutritionSummary) -> Option<&'static str> {
    let bmr = profile.bmr? as f64;
    if summary.record_count == 0 || summary.window_days == 0 {
        return None;
    }

    let daily_avg = summary.total_calories / f64::from(summary.window_days);
    if daily_avg < bmr * UNDER_EATING_RATIO {
        Some(UNDER_EATING)
    } else if daily_avg > bmr * OVER_EATING_RATIO {
        Some(OVER_EATING)
    } else {
        None
    }
}
