use anyhow::{Result, bail};
use serde::Serialize;

use forage_core::energy::{activity_multiplier, compute_energy};
use forage_core::models::{ActivityLevel, Gender};

#[derive(Debug, Serialize)]
struct EnergyEstimate {
    energy_requirement: i64,
    activity_level: &'static str,
    activity_multiplier: f64,
}

fn estimate(
    weight: Option<f64>,
    height: Option<f64>,
    age: Option<u32>,
    gender: Option<&str>,
    activity: Option<&str>,
) -> Result<EnergyEstimate> {
    if weight.is_some_and(|w| w <= 0.0) || height.is_some_and(|h| h <= 0.0) {
        bail!("Weight and height must be greater than 0");
    }

    let level = match activity {
        Some(raw) => {
            let parsed = ActivityLevel::parse(raw);
            if parsed.is_none() {
                eprintln!("Note: unknown activity level '{raw}', using moderate");
            }
            parsed
        }
        None => None,
    };
    let gender = gender.and_then(Gender::parse);

    let Some(energy) = compute_energy(weight, height, age, gender, level) else {
        bail!("--weight, --height, --age and --gender are all required");
    };

    Ok(EnergyEstimate {
        energy_requirement: energy,
        activity_level: level.unwrap_or(ActivityLevel::Moderate).as_str(),
        activity_multiplier: activity_multiplier(level),
    })
}

pub(crate) fn cmd_energy(
    weight: Option<f64>,
    height: Option<f64>,
    age: Option<u32>,
    gender: Option<&str>,
    activity: Option<&str>,
    json: bool,
) -> Result<()> {
    let est = estimate(weight, height, age, gender, activity)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&est)?);
        return Ok(());
    }

    let kcal = est.energy_requirement;
    let level = est.activity_level;
    let mult = est.activity_multiplier;
    println!("Daily energy requirement: {kcal} kcal ({level}, x{mult})");
    Ok(())
}
