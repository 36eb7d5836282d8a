use chrono::{DateTime, Duration, Utc};

use crate::models::{NutritionRecord, NutritionSummary};

/// Scale used to snap binary noise off a value before the tie test.
const SNAP_SCALE: f64 = 1e9;

/// Round to one decimal place, ties going up (14.25 -> 14.3).
///
/// Decimal ties such as 1.55 are not exact in binary (the mean of 0.3 and 2.8
/// is 1.5499999999999998), so the scaled value is snapped to nine decimal
/// places first.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let scaled = value * 10.0;
    let snapped = (scaled * SNAP_SCALE).round() / SNAP_SCALE;
    (snapped + 0.5).floor() / 10.0
}

/// Aggregate the records that fall inside the trailing window ending at `now`.
///
/// A record is in the window when `recorded_at >= now - window_days`. An
/// empty window yields an all-zero summary with `record_count == 0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(
    records: &[NutritionRecord],
    window_days: u32,
    now: DateTime<Utc>,
) -> NutritionSummary {
    let cutoff = now.checked_sub_signed(Duration::days(i64::from(window_days)));
    let in_window: Vec<&NutritionRecord> = records
        .iter()
        .filter(|r| cutoff.is_none_or(|c| r.recorded_at >= c))
        .collect();

    if in_window.is_empty() {
        return NutritionSummary {
            window_days,
            ..NutritionSummary::default()
        };
    }

    let count = in_window.len() as f64;
    let (calories, protein, carbs, fat) =
        in_window
            .iter()
            .fold((0.0, 0.0, 0.0, 0.0), |(cal, p, c, f), r| {
                (cal + r.calories, p + r.protein_g, c + r.carbs_g, f + r.fat_g)
            });

    NutritionSummary {
        total_calories: calories,
        avg_protein: round_half_up(protein / count),
        avg_carbs: round_half_up(carbs / count),
        avg_fat: round_half_up(fat / count),
        record_count: in_window.len(),
        window_days,
    }
}
