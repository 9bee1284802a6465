use crate::catalog::FoodCatalog;
use crate::error::{NutritionError, Result};
use crate::models::{DailyTargets, MacroTotals, MealEntry, MealSummary, TargetComparison};
use crate::targets::trunc;

/// Portion given to a food when it is first put on the menu.
pub const DEFAULT_PORTION_GRAMS: u32 = 100;

/// `portion / 100`, rounded to six decimals before it scales anything.
fn portion_coefficient(portion_grams: u32) -> f64 {
    let coefficient = f64::from(portion_grams) / 100.0;
    (coefficient * 1e6).round() / 1e6
}

/// Sums the macros of a meal list against the catalog.
///
/// Entries naming an unknown food are skipped: their index lands in
/// `skipped`, they add nothing to the totals, and their per-entry calories
/// are reported as 0. Every contribution is truncated before it is summed, and
/// sums saturate instead of overflowing.
#[must_use]
pub fn aggregate(entries: &[MealEntry], catalog: &FoodCatalog) -> MealSummary {
    let mut summary = MealSummary {
        per_entry_calories: Vec::with_capacity(entries.len()),
        ..MealSummary::default()
    };

    for (i, entry) in entries.iter().enumerate() {
        let Ok(food) = catalog.find_by_name(&entry.food_name) else {
            summary.skipped.insert(i);
            summary.per_entry_calories.push(0);
            continue;
        };

        let coefficient = portion_coefficient(entry.portion_grams);
        let totals = &mut summary.totals;
        totals.proteins = totals
            .proteins
            .saturating_add(trunc(coefficient * food.proteins_per_100g));
        totals.fats = totals
            .fats
            .saturating_add(trunc(coefficient * food.fats_per_100g));
        totals.carbs = totals
            .carbs
            .saturating_add(trunc(coefficient * food.carbs_per_100g));
        totals.calories = totals
            .calories
            .saturating_add(trunc(coefficient * food.calories_per_100g));

        let line_calories =
            trunc((food.calories_per_100g / 100.0) * f64::from(entry.portion_grams));
        summary.per_entry_calories.push(line_calories);
    }

    summary
}

/// Flags every total that is strictly above its daily target.
#[must_use]
pub fn compare(totals: &MacroTotals, targets: &DailyTargets) -> TargetComparison {
    TargetComparison {
        proteins_exceeded: totals.proteins > targets.proteins_g,
        fats_exceeded: totals.fats > targets.fats_g,
        carbs_exceeded: totals.carbs > targets.carbs_g,
        calories_exceeded: totals.calories > targets.calories_kcal,
    }
}

/// The user's working menu: an ordered list of foods with portions.
///
/// A portion of zero means "take this off the menu"; [`MealPlan::set_portion`]
/// applies that rule so [`aggregate`] never has to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPlan {
    entries: Vec<MealEntry>,
}

impl MealPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `food_name` with the default 100 g portion; returns its index.
    pub fn add(&mut self, food_name: &str) -> usize {
        self.entries
            .push(MealEntry::new(food_name, DEFAULT_PORTION_GRAMS));
        self.entries.len() - 1
    }

    /// Sets the portion for the entry at `index`. Zero removes the entry and
    /// returns `None`.
    pub fn set_portion(&mut self, index: usize, portion_grams: u32) -> Result<Option<&MealEntry>> {
        if index >= self.entries.len() {
            return Err(NutritionError::not_found("Menu entry", index.to_string()));
        }
        if portion_grams == 0 {
            self.entries.remove(index);
            return Ok(None);
        }
        let entry = &mut self.entries[index];
        entry.portion_grams = portion_grams;
        Ok(Some(&*entry))
    }

    pub fn remove(&mut self, index: usize) -> Result<MealEntry> {
        if index >= self.entries.len() {
            return Err(NutritionError::not_found("Menu entry", index.to_string()));
        }
        Ok(self.entries.remove(index))
    }

    #[must_use]
    pub fn entries(&self) -> &[MealEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
