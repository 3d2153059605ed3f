//! Profile metrics
//!
//! Pure derivation of BMI, BMR, daily calorie target, and macro goals
//! from a biometric profile. No I/O, no side effects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Profile, Sex};

/// Fraction of daily calories allotted to each macro
const PROTEIN_CALORIE_SHARE: f64 = 0.25;
const CARB_CALORIE_SHARE: f64 = 0.50;
const FAT_CALORIE_SHARE: f64 = 0.25;

/// Calories per gram of each macro
const PROTEIN_CAL_PER_G: f64 = 4.0;
const CARB_CAL_PER_G: f64 = 4.0;
const FAT_CAL_PER_G: f64 = 9.0;

/// Metrics computation error types
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    /// A required field is missing, non-finite, or non-positive.
    /// Sex lands here too: there is no defined formula for values
    /// outside male/female, so we refuse rather than guess.
    #[error("Cannot compute metrics: profile field '{0}' is missing or invalid")]
    InvalidInput(&'static str),
}

/// Derived health metrics for a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Body mass index, rounded to one decimal place
    pub bmi: f64,
    /// Mifflin-St Jeor basal metabolic rate, un-rounded. Rounding only
    /// happens after the activity multiplier is applied.
    pub bmr: f64,
    /// Daily calorie target: round(bmr * activity multiplier)
    pub daily_calories: u32,
    pub protein_goal_g: u32,
    pub carb_goal_g: u32,
    pub fat_goal_g: u32,
}

/// Compute derived metrics from a profile
///
/// Returns an error when any required field is unusable; never returns
/// partially-computed or NaN-laced output.
pub fn derive_metrics(profile: &Profile) -> Result<DerivedMetrics, MetricsError> {
    if profile.age <= 0 {
        return Err(MetricsError::InvalidInput("age"));
    }
    if !(profile.height_cm.is_finite() && profile.height_cm > 0.0) {
        return Err(MetricsError::InvalidInput("height_cm"));
    }
    if !(profile.weight_kg.is_finite() && profile.weight_kg > 0.0) {
        return Err(MetricsError::InvalidInput("weight_kg"));
    }
    let sex = profile.sex.ok_or(MetricsError::InvalidInput("sex"))?;

    let height_m = profile.height_cm / 100.0;
    let bmi = round_to_decimal(profile.weight_kg / (height_m * height_m));

    let age = profile.age as f64;
    let bmr = match sex {
        Sex::Male => 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * age + 5.0,
        Sex::Female => 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * age - 161.0,
    };

    let daily_calories = (bmr * profile.activity_level.multiplier()).round() as u32;
    let daily = daily_calories as f64;

    Ok(DerivedMetrics {
        bmi,
        bmr,
        daily_calories,
        protein_goal_g: (daily * PROTEIN_CALORIE_SHARE / PROTEIN_CAL_PER_G).round() as u32,
        carb_goal_g: (daily * CARB_CALORIE_SHARE / CARB_CAL_PER_G).round() as u32,
        fat_goal_g: (daily * FAT_CALORIE_SHARE / FAT_CAL_PER_G).round() as u32,
    })
}

/// Round to one decimal place (display precision for BMI)
fn round_to_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityLevel;

    fn profile(
        age: i64,
        sex: Option<Sex>,
        height_cm: f64,
        weight_kg: f64,
        activity_level: ActivityLevel,
    ) -> Profile {
        Profile {
            id: 1,
            email: "test@example.com".to_string(),
            age,
            sex,
            height_cm,
            weight_kg,
            activity_level,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_bmi_one_decimal() {
        let m = derive_metrics(&profile(
            25,
            Some(Sex::Male),
            175.0,
            70.0,
            ActivityLevel::Low,
        ))
        .unwrap();
        assert_eq!(m.bmi, 22.9);
    }

    #[test]
    fn test_bmr_male() {
        let m = derive_metrics(&profile(
            25,
            Some(Sex::Male),
            180.0,
            75.0,
            ActivityLevel::Low,
        ))
        .unwrap();
        // 10*75 + 6.25*180 - 5*25 + 5
        assert_eq!(m.bmr, 1755.0);
    }

    #[test]
    fn test_bmr_female_kept_unrounded() {
        let m = derive_metrics(&profile(
            30,
            Some(Sex::Female),
            165.0,
            60.0,
            ActivityLevel::Moderate,
        ))
        .unwrap();
        // 600 + 1031.25 - 150 - 161
        assert_eq!(m.bmr, 1320.25);
        // Rounding happens only after the multiplier: round(1320.25 * 1.55)
        assert_eq!(m.daily_calories, 2046);
    }

    #[test]
    fn test_activity_multiplier_applied() {
        let m = derive_metrics(&profile(
            25,
            Some(Sex::Male),
            180.0,
            75.0,
            ActivityLevel::Moderate,
        ))
        .unwrap();
        assert_eq!(m.daily_calories, (1755.0_f64 * 1.55).round() as u32);
        assert_eq!(m.daily_calories, 2720);
    }

    #[test]
    fn test_macro_split() {
        let m = derive_metrics(&profile(
            25,
            Some(Sex::Male),
            180.0,
            75.0,
            ActivityLevel::Low,
        ))
        .unwrap();
        let daily = m.daily_calories as f64;
        assert_eq!(m.protein_goal_g, (daily * 0.25 / 4.0).round() as u32);
        assert_eq!(m.carb_goal_g, (daily * 0.5 / 4.0).round() as u32);
        assert_eq!(m.fat_goal_g, (daily * 0.25 / 9.0).round() as u32);

        // And the canonical 2000 kcal figures
        assert_eq!((2000.0_f64 * 0.25 / 4.0).round() as u32, 125);
        assert_eq!((2000.0_f64 * 0.5 / 4.0).round() as u32, 250);
        assert_eq!((2000.0_f64 * 0.25 / 9.0).round() as u32, 56);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert_eq!(
            derive_metrics(&profile(0, Some(Sex::Male), 180.0, 75.0, ActivityLevel::Low)),
            Err(MetricsError::InvalidInput("age"))
        );
        assert_eq!(
            derive_metrics(&profile(25, Some(Sex::Male), 0.0, 75.0, ActivityLevel::Low)),
            Err(MetricsError::InvalidInput("height_cm"))
        );
        assert_eq!(
            derive_metrics(&profile(25, Some(Sex::Male), 180.0, -2.0, ActivityLevel::Low)),
            Err(MetricsError::InvalidInput("weight_kg"))
        );
        assert_eq!(
            derive_metrics(&profile(25, None, 180.0, 75.0, ActivityLevel::Low)),
            Err(MetricsError::InvalidInput("sex"))
        );
    }

    #[test]
    fn test_unknown_activity_text_behaves_as_low() {
        let low = derive_metrics(&profile(
            25,
            Some(Sex::Male),
            180.0,
            75.0,
            ActivityLevel::Low,
        ))
        .unwrap();
        let fallback = derive_metrics(&profile(
            25,
            Some(Sex::Male),
            180.0,
            75.0,
            ActivityLevel::from_str("unknown"),
        ))
        .unwrap();
        assert_eq!(low, fallback);
    }
}
