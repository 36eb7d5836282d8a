use crate::models::{ActivityLevel, Gender};

/// Multiplier applied when the activity level is missing or unrecognized.
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.55;

#[must_use]
pub fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
    match level {
        Some(ActivityLevel::Sedentary) => 1.2,
        Some(ActivityLevel::Light) => 1.375,
        Some(ActivityLevel::Moderate) | None => DEFAULT_ACTIVITY_MULTIPLIER,
        Some(ActivityLevel::Active) => 1.725,
        Some(ActivityLevel::VeryActive) => 1.9,
    }
}

/// Daily energy requirement (kcal) from the Mifflin-St Jeor equation scaled
/// by an activity multiplier.
///
/// Returns `None` when weight, height, age or gender is missing. The result is
/// truncated with `floor`, never rounded.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn compute_energy(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age: Option<u32>,
    gender: Option<Gender>,
    activity_level: Option<ActivityLevel>,
) -> Option<i64> {
    let (weight, height, age, gender) = (weight_kg?, height_cm?, age?, gender?);

    let base = 10.0 * weight + 6.25 * height - 5.0 * f64::from(age);
    let base = match gender {
        Gender::Male => base + 5.0,
        Gender::Other => base - 161.0,
    };

    Some((base * activity_multiplier(activity_level)).floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male(activity: Option<ActivityLevel>) -> Option<i64> {
        compute_energy(Some(70.0), Some(175.0), Some(30), Some(Gender::Male), activity)
    }

    #[test]
    fn test_reference_male_moderate() {
        // (700 + 1093.75 - 150 + 5) * 1.55 = 2555.5625
        assert_eq!(male(Some(ActivityLevel::Moderate)), Some(2555));
    }

    #[test]
    fn test_every_activity_level() {
        // base 1648.75
        assert_eq!(male(Some(ActivityLevel::Sedentary)), Some(1978));
        assert_eq!(male(Some(ActivityLevel::Light)), Some(2267));
        assert_eq!(male(Some(ActivityLevel::Active)), Some(2844));
        assert_eq!(male(Some(ActivityLevel::VeryActive)), Some(3132));
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        // 1648.75 * 1.2 = 1978.5 would round up to 1979
        assert_eq!(male(Some(ActivityLevel::Sedentary)), Some(1978));
        // 2555.5625 would round up to 2556
        assert_eq!(male(Some(ActivityLevel::Moderate)), Some(2555));
    }

    #[test]
    fn test_other_gender_offset() {
        let energy = compute_energy(
            Some(70.0),
            Some(175.0),
            Some(30),
            Some(Gender::Other),
            Some(ActivityLevel::Moderate),
        );
        // (1643.75 - 161) * 1.55 = 2298.2625
        assert_eq!(energy, Some(2298));
    }

    #[test]
    fn test_missing_activity_defaults_to_moderate() {
        assert_eq!(male(None), male(Some(ActivityLevel::Moderate)));
    }

    #[test]
    fn test_missing_inputs_return_none_for_all_levels() {
        let levels = ActivityLevel::ALL
            .into_iter()
            .map(Some)
            .chain(std::iter::once(None));
        for level in levels {
            let g = Some(Gender::Male);
            assert!(compute_energy(None, Some(175.0), Some(30), g, level).is_none());
            assert!(compute_energy(Some(70.0), None, Some(30), g, level).is_none());
            assert!(compute_energy(Some(70.0), Some(175.0), None, g, level).is_none());
            assert!(compute_energy(Some(70.0), Some(175.0), Some(30), None, level).is_none());
        }
    }

    #[test]
    fn test_multiplier_table() {
        assert!((activity_multiplier(Some(ActivityLevel::Sedentary)) - 1.2).abs() < f64::EPSILON);
        assert!((activity_multiplier(Some(ActivityLevel::Light)) - 1.375).abs() < f64::EPSILON);
        assert!((activity_multiplier(Some(ActivityLevel::Moderate)) - 1.55).abs() < f64::EPSILON);
        assert!((activity_multiplier(Some(ActivityLevel::Active)) - 1.725).abs() < f64::EPSILON);
        assert!((activity_multiplier(Some(ActivityLevel::VeryActive)) - 1.9).abs() < f64::EPSILON);
        assert!((activity_multiplier(None) - 1.55).abs() < f64::EPSILON);
    }
}
