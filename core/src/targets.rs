//! Daily calorie and macro targets derived from a user's body parameters.

use crate::error::{NutritionError, Result};
use crate::models::{BmiBand, DailyTargets, Goal, Sex, TargetReport, UserProfile};

/// Body-mass index: weight (kg) over height (m) squared.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn body_mass_index(profile: &UserProfile) -> f64 {
    let height_m = profile.height_cm as f64 * 0.01;
    profile.weight_kg as f64 / height_m.powi(2)
}

/// Basal metabolic rate in kcal/day (Harris-Benedict coefficients).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    let weight = profile.weight_kg as f64;
    let height = profile.height_cm as f64;
    let age = profile.age as f64;
    match profile.sex {
        Sex::Male => 88.362 + (13.397 * weight) + (4.799 * height) + (5.677 * age),
        Sex::Female => 447.593 + (9.247 * weight) + (3.097 * height) + (4.33 * age),
    }
}

/// Truncates toward zero; out-of-range values saturate at the `i64` bounds.
pub(crate) fn trunc(value: f64) -> i64 {
    value.trunc() as i64
}

/// Computes daily targets, or `Unavailable` for an unfilled or implausible
/// profile.
///
/// Each macro is truncated on its own; the calorie figure is truncated from
/// the untruncated value, so the macros do not add back up to it exactly.
pub fn compute_targets(profile: &UserProfile) -> Result<TargetReport> {
    if profile.is_unfilled() || !profile.is_plausible() {
        return Err(NutritionError::Unavailable {
            login: profile.login.clone(),
        });
    }

    let bmi = body_mass_index(profile);
    let band = BmiBand::classify(bmi);

    let mut calories = basal_metabolic_rate(profile) * profile.activity_level.multiplier();
    calories *= profile.goal.multiplier();

    let (proteins_share, fats_share, carbs_share) = match profile.goal {
        Goal::Gain => (0.15, 0.20, 0.65),
        Goal::Lose | Goal::Maintain => (0.15, 0.25, 0.6),
    };

    let proteins_g = trunc(calories * proteins_share / 4.0);
    let fats_g = trunc(calories * fats_share / 9.0);
    let carbs_g = trunc(calories * carbs_share / 4.0);
    let calories_kcal = trunc(calories);

    Ok(TargetReport {
        targets: DailyTargets {
            proteins_g,
            fats_g,
            carbs_g,
            calories_kcal,
        },
        bmi,
        band,
    })
}
