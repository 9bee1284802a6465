use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NutritionError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub proteins_per_100g: f64,
    pub fats_per_100g: f64,
    pub carbs_per_100g: f64,
    pub calories_per_100g: f64,
}

impl FoodItem {
    /// A freshly added food: every nutrient starts at zero.
    #[must_use]
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            proteins_per_100g: 0.0,
            fats_per_100g: 0.0,
            carbs_per_100g: 0.0,
            calories_per_100g: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Light,
    Moderate,
    High,
    Extreme,
}

impl ActivityLevel {
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::High => 1.725,
            Self::Extreme => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Lose => 0.85,
            Self::Maintain => 1.0,
            Self::Gain => 1.15,
        }
    }
}

/// Integer codes used by the persisted tables: `sex` 0/1, `activity` 0..=3, `goal` 0..=2.
macro_rules! coded_enum {
    ($ty:ident, $field:literal, [$($code:literal => $variant:ident),+ $(,)?]) => {
        impl $ty {
            #[must_use]
            pub fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            pub fn from_code(code: i64) -> Result<Self> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    other => Err(NutritionError::invalid($field, format!("unknown code {other}"))),
                }
            }
        }

        /// Accepts either the integer code or the lowercase name.
        impl std::str::FromStr for $ty {
            type Err = NutritionError;

            fn from_str(s: &str) -> Result<Self> {
                let s = s.trim();
                if let Ok(code) = s.parse::<i64>() {
                    return Self::from_code(code);
                }
                [$(Self::$variant),+]
                    .into_iter()
                    .find(|v| v.to_string().eq_ignore_ascii_case(s))
                    .ok_or_else(|| NutritionError::invalid($field, format!("unknown value '{s}'")))
            }
        }
    };
}

coded_enum!(Sex, "sex", [0 => Female, 1 => Male]);
coded_enum!(ActivityLevel, "activity_level", [0 => Light, 1 => Moderate, 2 => High, 3 => Extreme]);
coded_enum!(Goal, "goal", [0 => Lose, 1 => Maintain, 2 => Gain]);

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Female => "female",
            Self::Male => "male",
        })
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Extreme => "extreme",
        })
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lose => "lose",
            Self::Maintain => "maintain",
            Self::Gain => "gain",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub sex: Sex,
    pub age: i64,
    pub height_cm: i64,
    pub weight_kg: i64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl UserProfile {
    /// A just-registered user: every body parameter is zero ("unfilled").
    #[must_use]
    pub fn unfilled(login: &str, password: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
            sex: Sex::Female,
            age: 0,
            height_cm: 0,
            weight_kg: 0,
            activity_level: ActivityLevel::Light,
            goal: Goal::Lose,
        }
    }

    #[must_use]
    pub fn is_unfilled(&self) -> bool {
        self.age == 0
    }

    #[must_use]
    pub fn is_plausible(&self) -> bool {
        AGE_RANGE.contains(self.age)
            && HEIGHT_RANGE.contains(self.height_cm)
            && WEIGHT_RANGE.contains(self.weight_kg)
    }

    pub(crate) fn apply(&mut self, field: ProfileField) {
        match field {
            ProfileField::Age(v) => self.age = v,
            ProfileField::HeightCm(v) => self.height_cm = v,
            ProfileField::WeightKg(v) => self.weight_kg = v,
            ProfileField::Sex(v) => self.sex = v,
            ProfileField::ActivityLevel(v) => self.activity_level = v,
            ProfileField::Goal(v) => self.goal = v,
        }
    }
}

/// Open interval `(low, high)` used by the plausibility checks.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub field: &'static str,
    pub low: i64,
    pub high: i64,
}

impl Bounds {
    #[must_use]
    pub fn contains(self, value: i64) -> bool {
        self.low < value && value < self.high
    }

    pub fn check(self, value: i64) -> Result<i64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(NutritionError::invalid(
                self.field,
                format!(
                    "{value} is not realistic (should be between {} and {})",
                    self.low, self.high
                ),
            ))
        }
    }
}

pub const AGE_RANGE: Bounds = Bounds {
    field: "age",
    low: 6,
    high: 120,
};
pub const HEIGHT_RANGE: Bounds = Bounds {
    field: "height_cm",
    low: 60,
    high: 250,
};
pub const WEIGHT_RANGE: Bounds = Bounds {
    field: "weight_kg",
    low: 20,
    high: 600,
};

/// A single settable profile field together with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Age(i64),
    HeightCm(i64),
    WeightKg(i64),
    Sex(Sex),
    ActivityLevel(ActivityLevel),
    Goal(Goal),
}

impl ProfileField {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Age(_) => "age",
            Self::HeightCm(_) => "height_cm",
            Self::WeightKg(_) => "weight_kg",
            Self::Sex(_) => "sex",
            Self::ActivityLevel(_) => "activity_level",
            Self::Goal(_) => "goal",
        }
    }
}

/// The full parameter set edited together by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyParameters {
    pub sex: Sex,
    pub age: i64,
    pub height_cm: i64,
    pub weight_kg: i64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl BodyParameters {
    /// Rejects unrealistic age, height or weight, checked in that order.
    pub fn validate(&self) -> Result<()> {
        AGE_RANGE.check(self.age)?;
        HEIGHT_RANGE.check(self.height_cm)?;
        WEIGHT_RANGE.check(self.weight_kg)?;
        Ok(())
    }

    #[must_use]
    pub fn fields(&self) -> [ProfileField; 6] {
        [
            ProfileField::Age(self.age),
            ProfileField::WeightKg(self.weight_kg),
            ProfileField::HeightCm(self.height_cm),
            ProfileField::Sex(self.sex),
            ProfileField::ActivityLevel(self.activity_level),
            ProfileField::Goal(self.goal),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyTargets {
    pub proteins_g: i64,
    pub fats_g: i64,
    pub carbs_g: i64,
    pub calories_kcal: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiBand {
    Underweight,
    Normal,
    Overweight,
    ObesityGrade1,
    ObesityGrade2,
    ObesityGrade3,
}

impl BmiBand {
    #[must_use]
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else if bmi < 35.0 {
            Self::ObesityGrade1
        } else if bmi < 40.0 {
            Self::ObesityGrade2
        } else {
            Self::ObesityGrade3
        }
    }

    #[must_use]
    pub fn advice(self) -> &'static str {
        match self {
            Self::Underweight => "Your weight is small. You should gain some weight",
            Self::Normal => "Your weight is normal. You should maintain it",
            Self::Overweight => "You have an excess weight. You should lose some weight",
            Self::ObesityGrade1 => "You have a grade 1 obesity! You need to lose weight!",
            Self::ObesityGrade2 => "You have a grade 2 obesity! You need to lose weight!",
            Self::ObesityGrade3 => "You have a grade 3 obesity! You need to lose weight!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetReport {
    pub targets: DailyTargets,
    pub bmi: f64,
    pub band: BmiBand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    pub food_name: String,
    pub portion_grams: u32,
}

impl MealEntry {
    #[must_use]
    pub fn new(food_name: &str, portion_grams: u32) -> Self {
        Self {
            food_name: food_name.to_string(),
            portion_grams,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MacroTotals {
    pub proteins: i64,
    pub fats: i64,
    pub carbs: i64,
    pub calories: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MealSummary {
    pub totals: MacroTotals,
    /// One slot per input entry; skipped entries report 0.
    pub per_entry_calories: Vec<i64>,
    pub skipped: BTreeSet<usize>,
}

/// Which running totals went over their daily target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct TargetComparison {
    pub proteins_exceeded: bool,
    pub fats_exceeded: bool,
    pub carbs_exceeded: bool,
    pub calories_exceeded: bool,
}

impl TargetComparison {
    #[must_use]
    pub fn any_exceeded(&self) -> bool {
        self.proteins_exceeded || self.fats_exceeded || self.carbs_exceeded || self.calories_exceeded
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuReport {
    pub summary: MealSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<DailyTargets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<TargetComparison>,
}
